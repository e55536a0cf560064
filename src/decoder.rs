use crate::config::DecoderPolicy;
use esfixture_client::{Client, StrictDecoder};
use std::sync::Arc;

/// Installs the decoder selected by `policy`.
///
/// Strict decoding replaces the client's decoder only while it is still the
/// default one; a decoder chosen by the caller is left alone. Lenient decoding
/// never touches the slot. Returns whether the slot was changed.
pub fn apply_decoder_policy(client: &mut Client, policy: DecoderPolicy) -> bool {
    match policy {
        DecoderPolicy::Strict if client.decoder().is_default() => {
            client.set_decoder(Arc::new(StrictDecoder));
            tracing::debug!("[SETUP] strict decoding enabled");
            true
        }
        DecoderPolicy::Strict => {
            tracing::debug!(
                "[SETUP] keeping caller-provided decoder '{}' despite strict mode",
                client.decoder().name()
            );
            false
        }
        DecoderPolicy::Lenient => false,
    }
}
