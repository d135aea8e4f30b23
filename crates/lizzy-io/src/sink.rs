//! [`ResultsSink`]: the trait an external results writer (the real
//! engine hands its XDMF+HDF5 writer a sequence of snapshots, per spec
//! §6) implements, plus [`FileResultsSink`], a JSON-lines sink that
//! ships as the ambient, inspectable test tooling a complete repo still
//! needs even though the real writer is out of scope.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use lizzy_core::Real;
use lizzy_sim::Solution;

use crate::error::{IoError, IoResult};
use crate::record::{FieldRecord, Manifest};

/// Implemented by an external results writer. `write_snapshot` is
/// called once per write-out, in chronological order; `finish` is
/// called once the run (or run interval) ends, for sinks that need to
/// flush or close a resource.
pub trait ResultsSink {
    fn write_snapshot(&mut self, record: &FieldRecord) -> IoResult<()>;

    fn finish(&mut self) -> IoResult<()> {
        Ok(())
    }

    /// Optional companion CV-mesh geometry, as VTK polydata per spec
    /// §6. Not every sink needs it; the default is a no-op.
    fn write_cv_geometry(&mut self, _node_positions: &[[Real; 3]], _cv_volumes: &[Real]) -> IoResult<()> {
        Ok(())
    }
}

/// Writes one JSON object per line to `<root>/<case_name>.jsonl`,
/// preceded by `<case_name>.manifest.json`. Concrete, human-inspectable
/// stand-in for the real XDMF+HDF5 writer (spec §6, out of scope).
pub struct FileResultsSink {
    path: PathBuf,
    case_name: String,
    root: PathBuf,
    file: File,
    count: usize,
    written: Vec<FieldRecord>,
}

impl FileResultsSink {
    pub fn create(root: impl AsRef<Path>, case_name: &str) -> IoResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|source| IoError::Write {
            path: root.display().to_string(),
            source,
        })?;
        let path = root.join(format!("{case_name}.jsonl"));
        let file = File::create(&path).map_err(|source| IoError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            path,
            case_name: case_name.to_string(),
            root: root.to_path_buf(),
            file,
            count: 0,
            written: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(format!("{}.manifest.json", self.case_name))
    }

    pub fn snapshot_count(&self) -> usize {
        self.count
    }

    /// Convenience: write every snapshot of a completed [`Solution`] in
    /// one call, the shape `save_results(sol, case_name)` (spec §6)
    /// hands the writer, then emit the companion manifest.
    pub fn write_solution(&mut self, solution: &Solution, fill_tolerance: Real) -> IoResult<()> {
        for snapshot in &solution.snapshots {
            let record = FieldRecord::from_snapshot(snapshot, fill_tolerance);
            self.write_snapshot(&record)?;
        }
        self.finish()
    }

    fn write_manifest(&self) -> IoResult<()> {
        let manifest = Manifest::new(&self.case_name, &self.written);
        let json = serde_json::to_string_pretty(&manifest)?;
        let path = self.manifest_path();
        fs::write(&path, json).map_err(|source| IoError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

impl ResultsSink for FileResultsSink {
    fn write_snapshot(&mut self, record: &FieldRecord) -> IoResult<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{line}").map_err(|source| IoError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        self.count += 1;
        self.written.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        self.file.flush().map_err(|source| IoError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        self.write_manifest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizzy_sim::{InletSnapshot, Snapshot};
    use nalgebra::Vector3;

    #[test]
    fn writes_one_line_per_snapshot() {
        let dir = tempdir();
        let mut sink = FileResultsSink::create(&dir, "case_a").unwrap();

        let mut solution = Solution::new();
        for i in 0..3 {
            solution.push(Snapshot {
                t: i as Real,
                p: vec![1e5, 0.0],
                v: vec![Vector3::zeros()],
                f: vec![1.0, 0.0],
                inlet_states: vec![InletSnapshot {
                    name: "inlet".to_string(),
                    p: 1e5,
                    open: true,
                }],
                sensor_readings: vec![],
            });
        }
        sink.write_solution(&solution, 1e-3).unwrap();
        assert_eq!(sink.snapshot_count(), 3);

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
        for line in contents.lines() {
            let record: FieldRecord = serde_json::from_str(line).unwrap();
            assert_eq!(record.pressure.len(), 2);
        }

        let manifest_json = fs::read_to_string(sink.manifest_path()).unwrap();
        let manifest: crate::record::Manifest = serde_json::from_str(&manifest_json).unwrap();
        assert_eq!(manifest.case_name, "case_a");
        assert_eq!(manifest.snapshot_count, 3);
        assert!(!manifest.run_id.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    fn tempdir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("lizzy-io-test-{}", std::process::id()));
        p
    }
}
