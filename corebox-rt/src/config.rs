//! Plain key/value configuration file parsing (spec §6).
//!
//! Hand-rolled rather than TOML/serde-based: grounded on
//! `original_source/Scheduler.cpp::initialize`, which does the same
//! line-by-line `key value` parsing. There is no schema here a derive
//! macro would help with.

use crate::error::SchedulerError;
use crate::policy::Policy;
use std::path::Path;

/// Scheduler parameters, immutable after [`Scheduler::initialize`](crate::scheduler::Scheduler::initialize)
/// (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub num_cpu: u32,
    pub scheduler: String,
    pub quantum_cycles: u32,
    pub batch_process_freq: u32,
    pub min_ins: u32,
    pub max_ins: u32,
    pub delay_per_exec: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_cpu: 4,
            scheduler: "rr".to_string(),
            quantum_cycles: 5,
            batch_process_freq: 1,
            min_ins: 1000,
            max_ins: 2000,
            delay_per_exec: 0,
        }
    }
}

impl SchedulerConfig {
    /// Build the tagged [`Policy`] this config describes.
    pub fn policy(&self) -> Result<Policy, SchedulerError> {
        Policy::parse(&self.scheduler, self.quantum_cycles)
    }

    /// Load a config file, falling back to defaults field-by-field for any
    /// key that is missing or malformed. Returns the CONFIG_IO error (and
    /// keeps defaults) if the file cannot be opened — not fatal per spec §7.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SchedulerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();
        for line in contents.lines() {
            let trimmed = line.trim();
            let mut parts = trimmed.split_whitespace();
            let Some(key) = parts.next() else { continue };
            let Some(value) = parts.next() else { continue };

            match key {
                "num-cpu" => {
                    if let Ok(v) = value.parse() {
                        config.num_cpu = v;
                    }
                }
                "scheduler" => config.scheduler = strip_quotes(value).to_string(),
                "quantum-cycles" => {
                    if let Ok(v) = value.parse() {
                        config.quantum_cycles = v;
                    }
                }
                "batch-process-freq" => {
                    if let Ok(v) = value.parse() {
                        config.batch_process_freq = v;
                    }
                }
                "min-ins" => {
                    if let Ok(v) = value.parse() {
                        config.min_ins = v;
                    }
                }
                "max-ins" => {
                    if let Ok(v) = value.parse() {
                        config.max_ins = v;
                    }
                }
                "delay-per-exec" => {
                    if let Ok(v) = value.parse() {
                        config.delay_per_exec = v;
                    }
                }
                _ => {} // unknown keys are ignored
            }
        }

        Ok(config)
    }
}

/// Strip one pair of matching ASCII double quotes, if present.
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn missing_file_is_not_fatal_and_keeps_defaults() {
        let err = SchedulerConfig::load("/nonexistent/path/config.txt").unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigIo { .. }));
    }

    #[test]
    fn parses_all_recognized_keys() {
        let temp = write_temp(
            "num-cpu 8\nscheduler \"fcfs\"\nquantum-cycles 10\nbatch-process-freq 3\nmin-ins 50\nmax-ins 100\ndelay-per-exec 2\n",
        );
        let config = SchedulerConfig::load(temp.path()).unwrap();
        assert_eq!(config.num_cpu, 8);
        assert_eq!(config.scheduler, "fcfs");
        assert_eq!(config.quantum_cycles, 10);
        assert_eq!(config.batch_process_freq, 3);
        assert_eq!(config.min_ins, 50);
        assert_eq!(config.max_ins, 100);
        assert_eq!(config.delay_per_exec, 2);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let temp = write_temp("num-cpu 2\nsome-future-key 99\n");
        let config = SchedulerConfig::load(temp.path()).unwrap();
        assert_eq!(config.num_cpu, 2);
    }

    #[test]
    fn malformed_lines_are_ignored() {
        let temp = write_temp("num-cpu\nscheduler rr\n");
        let config = SchedulerConfig::load(temp.path()).unwrap();
        assert_eq!(config.num_cpu, 4); // default retained, line had no value
        assert_eq!(config.scheduler, "rr");
    }

    #[test]
    fn quotes_are_stripped_from_scheduler_value() {
        let temp = write_temp("scheduler \"rr\"\n");
        let config = SchedulerConfig::load(temp.path()).unwrap();
        assert_eq!(config.scheduler, "rr");
    }
}
