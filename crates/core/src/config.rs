//! Process-wide ring parameters.
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::consts::DEFAULT_CHECK_PREDECESSOR_PERIOD;
use crate::consts::DEFAULT_FIX_FINGER_PERIOD;
use crate::consts::DEFAULT_MAX_OFFSET;
use crate::consts::DEFAULT_RING_SIZE;
use crate::consts::DEFAULT_STABILIZE_PERIOD;
use crate::consts::DEFAULT_SUCCESSOR_LIST_SIZE;
use crate::consts::MAX_RING_SIZE;
use crate::dht::IdSpace;
use crate::error::Error;
use crate::error::Result;

/// Immutable configuration of a simulated ring.
/// All periods are expressed in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingConfig {
    /// Bit width `m` of the identifier space.
    pub ring_size: u32,
    /// Successor list length `r`. A node keeps `finger[0]` plus `r - 1` more.
    pub successor_list_size: usize,
    pub stabilize_period: u64,
    pub fix_finger_period: u64,
    pub check_predecessor_period: u64,
    /// Clock offsets are drawn from `0..=max_offset`.
    pub max_offset: u64,
    /// Seed of the swarm RNG. A random seed is drawn and logged when absent.
    pub seed: Option<u64>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_size: DEFAULT_RING_SIZE,
            successor_list_size: DEFAULT_SUCCESSOR_LIST_SIZE,
            stabilize_period: DEFAULT_STABILIZE_PERIOD,
            fix_finger_period: DEFAULT_FIX_FINGER_PERIOD,
            check_predecessor_period: DEFAULT_CHECK_PREDECESSOR_PERIOD,
            max_offset: DEFAULT_MAX_OFFSET,
            seed: None,
        }
    }
}

/// Expand path with "~" to absolute path.
pub fn expand_home<P>(path: P) -> Result<PathBuf>
where P: AsRef<Path> {
    let Ok(stripped) = path.as_ref().strip_prefix("~") else {
        return Ok(path.as_ref().to_path_buf());
    };

    let Some(mut p) = home::home_dir() else {
        return Err(Error::HomeDirError);
    };

    p.push(stripped);

    Ok(p)
}

impl RingConfig {
    /// Check every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.ring_size == 0 || self.ring_size > MAX_RING_SIZE {
            return Err(Error::InvalidConfig(format!(
                "ring_size must be in 1..={}, got {}",
                MAX_RING_SIZE, self.ring_size
            )));
        }
        if self.successor_list_size == 0 {
            return Err(Error::InvalidConfig(
                "successor_list_size must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("stabilize_period", self.stabilize_period),
            ("fix_finger_period", self.fix_finger_period),
            ("check_predecessor_period", self.check_predecessor_period),
            ("max_offset", self.max_offset),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// The identifier space described by `ring_size`.
    pub fn id_space(&self) -> IdSpace {
        IdSpace::new(self.ring_size)
    }

    pub fn write_fs<P>(&self, path: P) -> Result<PathBuf>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|e| Error::CreateFileError(e.to_string()))?;
            }
        }
        let f = fs::File::create(&path).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self).map_err(|_| Error::EncodeError)?;
        Ok(path)
    }

    pub fn read_fs<P>(path: P) -> Result<RingConfig>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        let config: RingConfig =
            serde_yaml::from_reader(f_rdr).map_err(|e| Error::DecodeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
