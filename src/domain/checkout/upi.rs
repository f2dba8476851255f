use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::domain::payments::{QrRequest, QrResponse};

use super::PaymentBackend;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QrState {
    #[default]
    Idle,
    Generating,
    Ready(QrResponse),
    Failed(String),
}

/// What the UPI branch of the form shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpiPanel {
    pub upi_id: String,
    pub qr: QrState,
    /// Set by the shopper, never by a processor.
    pub payment_verified: bool,
}

/// Debounced QR generation. Scheduling aborts whatever was scheduled before, and a
/// response is applied only if no newer request has been scheduled since.
pub(crate) struct QrGenerator {
    backend: Arc<dyn PaymentBackend>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    panel: Arc<watch::Sender<UpiPanel>>,
}

impl QrGenerator {
    pub(crate) fn new(backend: Arc<dyn PaymentBackend>, debounce: Duration, upi_id: String) -> Self {
        let (panel, _) = watch::channel(UpiPanel {
            upi_id,
            ..Default::default()
        });
        Self {
            backend,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            panel: Arc::new(panel),
        }
    }

    pub(crate) fn panel(&self) -> UpiPanel {
        self.panel.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<UpiPanel> {
        self.panel.subscribe()
    }

    pub(crate) fn update(&self, modify: impl FnOnce(&mut UpiPanel)) {
        self.panel.send_modify(modify);
    }

    pub(crate) fn schedule(&mut self, request: QrRequest) {
        self.schedule_after(request, self.debounce);
    }

    pub(crate) fn schedule_now(&mut self, request: QrRequest) {
        self.schedule_after(request, Duration::ZERO);
    }

    fn schedule_after(&mut self, request: QrRequest, delay: Duration) {
        let ticket = self.supersede();
        let backend = self.backend.clone();
        let generation = self.generation.clone();
        let panel = self.panel.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let is_current = || generation.load(Ordering::SeqCst) == ticket;

            let started = panel.send_if_modified(|state| {
                if !is_current() {
                    return false;
                }
                state.qr = QrState::Generating;
                state.payment_verified = false;
                true
            });
            if !started {
                return;
            }

            let result = backend.generate_qr(&request).await;
            let applied = panel.send_if_modified(|state| {
                if !is_current() {
                    return false;
                }
                state.qr = match result {
                    Ok(qr) => QrState::Ready(qr),
                    Err(e) => QrState::Failed(format!("Could not generate QR: {e}")),
                };
                true
            });
            if !applied {
                debug!("Discarded QR response for a superseded request");
            }
        }));
    }

    /// Cancels anything in flight and resets the QR to idle.
    pub(crate) fn cancel(&mut self) {
        self.supersede();
        self.panel.send_modify(|state| {
            state.qr = QrState::Idle;
            state.payment_verified = false;
        });
    }

    fn supersede(&mut self) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for QrGenerator {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
