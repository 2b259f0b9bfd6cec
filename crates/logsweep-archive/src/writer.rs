//! Zip writer for a single source directory

use crate::FsError;
use logsweep_domain::ArchiveStats;
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entries at or above this size need the zip64 extension
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// File name prefix of an archive that is still being written
pub const STAGING_PREFIX: &str = ".logsweep-";

/// File name suffix of an archive that is still being written
pub const STAGING_SUFFIX: &str = ".partial";

/// Mode requested for new archives; the process umask still applies
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o666;

/// Whether `path` names a staging file written by [`write_zip`]
///
/// A staging file only outlives its write when the process was killed
/// before it could clean up.
pub fn is_staging_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            name.len() > STAGING_PREFIX.len() + STAGING_SUFFIX.len()
                && name.starts_with(STAGING_PREFIX)
                && name.ends_with(STAGING_SUFFIX)
        })
}

/// Compress every regular file below `source` into a new zip at `destination`
///
/// Entry names are rooted at the source directory's own name, so extracting
/// the archive recreates a top-level folder with that name. The archive is
/// staged in a temporary file beside `destination` and only moved into place
/// once complete; an existing file at `destination` is never replaced.
pub fn write_zip(source: &Path, destination: &Path) -> Result<ArchiveStats, FsError> {
    let root_name = source
        .file_name()
        .ok_or_else(|| FsError::InvalidSource {
            path: source.to_path_buf(),
            reason: "source has no directory name".to_string(),
        })?
        .to_string_lossy()
        .into_owned();

    if !source.is_dir() {
        return Err(FsError::InvalidSource {
            path: source.to_path_buf(),
            reason: "source is not a directory".to_string(),
        });
    }

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX).suffix(STAGING_SUFFIX);
    // tempfile defaults to 0600; archives get the same mode as any new file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(ARCHIVE_MODE));
    }
    let mut staged = builder
        .tempfile_in(parent)
        .map_err(|e| FsError::io(parent, e))?;

    let stats = {
        let mut zip = ZipWriter::new(staged.as_file_mut());
        let stats = append_tree(&mut zip, source, &root_name, destination)?;
        zip.finish().map_err(|e| FsError::Zip {
            path: destination.to_path_buf(),
            source: e,
        })?;
        stats
    };

    staged
        .as_file()
        .sync_all()
        .map_err(|e| FsError::io(staged.path(), e))?;

    // Dropping `staged` on any error path removes the partial file
    staged
        .persist_noclobber(destination)
        .map_err(|e| FsError::Persist {
            path: destination.to_path_buf(),
            source: e.error,
        })?;

    tracing::debug!(
        "Wrote {} ({} files, {} bytes uncompressed)",
        destination.display(),
        stats.files,
        stats.bytes
    );

    Ok(stats)
}

fn append_tree<W: io::Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    source: &Path,
    root_name: &str,
    destination: &Path,
) -> Result<ArchiveStats, FsError> {
    let mut stats = ArchiveStats::default();
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| FsError::Walk {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| FsError::InvalidSource {
                path: entry.path().to_path_buf(),
                reason: "entry escaped the source directory".to_string(),
            })?;
        let name = entry_name(root_name, relative);

        let size = entry
            .metadata()
            .map(|m| m.len())
            .map_err(|e| FsError::Walk {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        let options = base.large_file(size >= ZIP64_THRESHOLD);

        zip.start_file(name, options).map_err(|e| FsError::Zip {
            path: destination.to_path_buf(),
            source: e,
        })?;

        let mut file = File::open(entry.path()).map_err(|e| FsError::io(entry.path(), e))?;
        let written = io::copy(&mut file, zip).map_err(|e| FsError::io(entry.path(), e))?;

        stats.files += 1;
        stats.bytes += written;
    }

    Ok(stats)
}

/// Zip entry name: `root/relative/parts`, always `/`-separated
fn entry_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
