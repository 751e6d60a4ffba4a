//! Communication channel selection.

use kiln_pipeline::{ready, CancellationToken, PipelineStep, StepError, StepFuture};

use crate::context::CompileContext;
use crate::error::ChannelError;
use crate::steps::CHANNEL_CONFIGURATOR_PRIORITY;

/// Resolves the channel the host uses to talk to the hardware.
///
/// The requested channel must be one the device supports; without a
/// request the device's default channel is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelConfigurator;

impl PipelineStep<CompileContext> for ChannelConfigurator {
    fn name(&self) -> &str {
        "channel-configurator"
    }

    fn priority(&self) -> f64 {
        CHANNEL_CONFIGURATOR_PRIORITY
    }

    fn run<'a>(&'a self, context: &'a mut CompileContext, _cancel: &'a CancellationToken) -> StepFuture<'a> {
        ready(configure_channel(context).map_err(StepError::from))
    }
}

/// Sets [`CompileContext::channel`].
///
/// # Errors
///
/// Fails if the request names an unsupported channel or the device has none.
pub fn configure_channel(context: &mut CompileContext) -> Result<(), ChannelError> {
    let manifest = context.manifest();
    let channel = match &context.config.channel {
        Some(requested) if manifest.supports_channel(requested) => requested.clone(),
        Some(requested) => {
            return Err(ChannelError::Unsupported {
                device: manifest.name().to_string(),
                channel: requested.clone(),
                supported: manifest.supported_channels().to_vec(),
            })
        }
        None => manifest
            .default_channel()
            .map(str::to_string)
            .ok_or_else(|| ChannelError::NoChannel {
                device: manifest.name().to_string(),
            })?,
    };
    log::info!("{}: using channel '{channel}'", manifest.name());
    context.channel = Some(channel);
    Ok(())
}
