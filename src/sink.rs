use crate::error::{SwarmError, SwarmResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Receives the global best after every iteration.
///
/// Failures are reported back to the engine, which logs them and carries on.
/// A sink can never change the optimizer's state.
pub trait IterationSink {
    fn notify(&mut self, iteration: usize, best_position: &[f64], best_fitness: f64)
        -> SwarmResult<()>;
}

impl<S: IterationSink + ?Sized> IterationSink for &mut S {
    fn notify(
        &mut self,
        iteration: usize,
        best_position: &[f64],
        best_fitness: f64,
    ) -> SwarmResult<()> {
        (**self).notify(iteration, best_position, best_fitness)
    }
}

pub struct NullSink;

impl IterationSink for NullSink {
    fn notify(&mut self, _: usize, _: &[f64], _: f64) -> SwarmResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub position: Vec<f64>,
    pub fitness: f64,
}

/// Keeps every notification in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySink {
    pub records: Vec<IterationRecord>,
}

impl HistorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IterationSink for HistorySink {
    fn notify(
        &mut self,
        iteration: usize,
        best_position: &[f64],
        best_fitness: f64,
    ) -> SwarmResult<()> {
        self.records.push(IterationRecord {
            iteration,
            position: best_position.to_vec(),
            fitness: best_fitness,
        });
        Ok(())
    }
}

/// Appends the global best to a CSV file, one row per group of parameters.
///
/// Row layout: `iteration, unit_id, <group columns...>, best_fitness`, with
/// `unit_id` counting groups from 1. The header is written only when the file
/// starts out empty.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    group_size: usize,
    precision: usize,
}

impl CsvSink {
    pub fn create<P: AsRef<Path>>(path: P, group_size: usize) -> SwarmResult<Self> {
        let columns = (0..group_size).map(|i| format!("p{}", i)).collect();
        Self::with_columns(path, columns)
    }

    pub fn with_columns<P: AsRef<Path>>(path: P, columns: Vec<String>) -> SwarmResult<Self> {
        if columns.is_empty() {
            return Err(SwarmError::config("CSV sink needs at least one parameter column"));
        }

        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let fresh = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if fresh {
            let mut header = vec!["iteration".to_string(), "unit_id".to_string()];
            header.extend(columns.iter().cloned());
            header.push("best_fitness".to_string());
            writer.write_record(&header)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer,
            group_size: columns.len(),
            precision: 4,
        })
    }

    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IterationSink for CsvSink {
    fn notify(
        &mut self,
        iteration: usize,
        best_position: &[f64],
        best_fitness: f64,
    ) -> SwarmResult<()> {
        if best_position.len() % self.group_size != 0 {
            return Err(SwarmError::Sink(format!(
                "{} parameters do not split into groups of {}",
                best_position.len(),
                self.group_size
            )));
        }

        let p = self.precision;
        for (unit, group) in best_position.chunks(self.group_size).enumerate() {
            let mut row = vec![iteration.to_string(), (unit + 1).to_string()];
            row.extend(group.iter().map(|v| format!("{:.*}", p, v)));
            row.push(format!("{:.*}", p, best_fitness));
            self.writer.write_record(&row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
