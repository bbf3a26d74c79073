use sx_ratelimit::CancellationToken;

/// Sets up a Ctrl+C handler that cancels the running search
pub fn setup(cancel: CancellationToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        cancel.cancel();
    })
}
