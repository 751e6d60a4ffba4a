//! Writes the generated VHDL to the output directory.

use std::path::PathBuf;

use kiln_common::ContentHash;
use kiln_hdl::HdlLanguage;
use kiln_pipeline::{CancellationToken, PipelineStep, StepError, StepFuture};

use crate::context::CompileContext;
use crate::error::BuildError;
use crate::representation::HardwareImplementation;
use crate::steps::BUILD_PROVIDER_PRIORITY;

/// Turns the hardware description into an implementation artifact.
///
/// The artifact is the VHDL source itself, written to
/// `<output_dir>/<top>.vhd`. Vendor synthesis runs on top of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VhdlBuildProvider;

impl PipelineStep<CompileContext> for VhdlBuildProvider {
    fn name(&self) -> &str {
        "vhdl-build-provider"
    }

    fn priority(&self) -> f64 {
        BUILD_PROVIDER_PRIORITY
    }

    fn run<'a>(&'a self, context: &'a mut CompileContext, cancel: &'a CancellationToken) -> StepFuture<'a> {
        Box::pin(async move { build(context, cancel).await.map_err(StepError::from) })
    }
}

/// Path of the artifact for this context.
pub fn artifact_path(context: &CompileContext) -> PathBuf {
    context
        .config
        .output_dir
        .join(format!("{}.{}", context.config.top, HdlLanguage::Vhdl.file_extension()))
}

/// Writes the description and sets [`CompileContext::implementation`].
///
/// If `cancel` fires while the file is being written, the file is removed
/// again and no implementation is set. A run cancelled by dropping this
/// future mid-write cannot undo a write already handed to the blocking
/// pool, so the artifact may remain in that case.
///
/// # Errors
///
/// Fails without a VHDL description, or if the file cannot be written or
/// removed after cancellation.
pub async fn build(context: &mut CompileContext, cancel: &CancellationToken) -> Result<(), BuildError> {
    let description = context.description.as_ref().ok_or(BuildError::NoDescription)?;
    if description.language() != HdlLanguage::Vhdl {
        return Err(BuildError::UnsupportedLanguage {
            language: description.language(),
        });
    }

    let dir = context.config.output_dir.clone();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| BuildError::Write {
            path: dir.clone(),
            source,
        })?;

    let path = artifact_path(context);
    let bytes = description.source().as_bytes();
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
    if cancel.is_cancelled() {
        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| BuildError::Remove {
                path: path.clone(),
                source,
            })?;
        log::info!("build cancelled; removed {}", path.display());
        return Ok(());
    }

    let checksum = ContentHash::from_bytes(bytes);
    log::info!("wrote {} ({} bytes, {})", path.display(), bytes.len(), checksum.short());

    context.implementation = Some(HardwareImplementation {
        artifact_path: path,
        checksum,
    });
    Ok(())
}
