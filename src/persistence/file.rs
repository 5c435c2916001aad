use super::PersistenceResult;
use crate::workspace::Workspace;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Snapshots are validated on the way in and on the way out, so a file
/// written here always loads back.
pub fn save_workspace_to_writer<W: Write>(workspace: &Workspace, writer: W) -> PersistenceResult<()> {
    super::validate_snapshot(workspace)?;
    serde_json::to_writer_pretty(writer, workspace)?;
    Ok(())
}

pub fn load_workspace_from_reader<R: Read>(reader: R) -> PersistenceResult<Workspace> {
    let workspace: Workspace = serde_json::from_reader(reader)?;
    super::validate_snapshot(&workspace)?;
    Ok(workspace)
}

pub fn save_workspace_to_json<P: AsRef<Path>>(workspace: &Workspace, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_workspace_to_writer(workspace, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_workspace_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Workspace> {
    let file = File::open(path)?;
    load_workspace_from_reader(BufReader::new(file))
}
