//! The external-converter backend.

use std::{
  io::Write,
  process::{
    Command,
    Stdio,
  },
};

use which::which;

use crate::export::{
  ExportError,
  ExportJob,
  cleanup_partial,
};

/// Convert `job.source` to `target` (a pandoc output format name) by
/// feeding it to the converter on stdin. The converter writes the output
/// file itself; we only judge the exit status.
pub(super) fn export(job: &ExportJob, target: &str) -> Result<(), ExportError> {
  let program =
    which(&job.pandoc).map_err(|_| ExportError::ToolMissing(job.pandoc.clone()))?;
  let existed_before = job.output.exists();

  log::debug!(
    "running {} --to {target} --output {}",
    program.display(),
    job.output.display()
  );
  let mut child = Command::new(program)
    .arg("--from")
    .arg("markdown")
    .arg("--to")
    .arg(target)
    .arg("--standalone")
    .arg("--output")
    .arg(&job.output)
    .arg("-")
    .stdin(Stdio::piped())
    .stdout(Stdio::null())
    .stderr(Stdio::piped())
    .spawn()?;

  if let Some(mut stdin) = child.stdin.take() {
    // A converter that dies early closes its end of the pipe; the exit
    // status below tells the real story, not this write.
    let _ = stdin.write_all(job.source.as_bytes());
  }

  let output = child.wait_with_output()?;
  if output.status.success() {
    Ok(())
  } else {
    cleanup_partial(&job.output, existed_before);
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ExportError::Conversion(stderr.trim().to_string()))
  }
}
