//! Best `goals_for` per category, kept across sessions in a JSON file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::quiz::catalog::Category;

#[derive(Debug)]
pub struct ScoreBoard {
    path: PathBuf,
    best: BTreeMap<Category, u32>,
}

impl ScoreBoard {
    /// A missing file is an empty table.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let best = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No score table at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self { path, best })
    }

    /// Like [`ScoreBoard::load`], but an unreadable table is replaced by an
    /// empty one on the next save.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!(
                "Unable to read score table at {}: {}, starting empty",
                path.display(),
                e
            );
            Self {
                path: path.to_path_buf(),
                best: BTreeMap::new(),
            }
        })
    }

    pub fn best(&self, category: Category) -> Option<u32> {
        self.best.get(&category).copied()
    }

    /// Stores `goals_for` if it beats the current best.
    ///
    /// Returns whether the result is a new best worth announcing. A scoreless
    /// first result is stored without one.
    pub fn record(&mut self, category: Category, goals_for: u32) -> io::Result<bool> {
        let previous = self.best(category);
        if previous.is_some_and(|best| best >= goals_for) {
            return Ok(false);
        }
        self.best.insert(category, goals_for);
        self.save()?;
        info!("New best for {:?}: {}", category, goals_for);
        Ok(previous.is_some() || goals_for > 0)
    }

    /// Writes a sibling file and renames it over the table. A crash mid-write
    /// leaves the previous table in place.
    fn save(&self) -> io::Result<()> {
        let tmp = self.tmp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &self.best)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
