use crate::contributions::model::ContributionSummary;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn write_json(dir: &Path, name: &str, summaries: &[ContributionSummary]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.json"));
    debug!(path = %path.display(), "writing json report");
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, summaries)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

pub fn write_csv(dir: &Path, name: &str, summaries: &[ContributionSummary]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.csv"));
    debug!(path = %path.display(), "writing csv report");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;
    writer.write_record(ContributionSummary::HEADERS)?;
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(path)
}
