//! Appointment change feed.
//!
//! Handlers publish after every successful write; dashboard connections
//! subscribe and filter by their staff scope before forwarding over SSE.

use sorriso_core::{
    filters::StaffScope,
    models::appointment::{Appointment, AppointmentEvent, AppointmentEventKind},
};
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging.
pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppointmentEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }
}

impl EventBus {
    pub fn subscribe(&self) -> broadcast::Receiver<AppointmentEvent> {
        self.sender.subscribe()
    }

    /// Publishing with no open dashboards is not an error.
    pub fn publish(&self, kind: AppointmentEventKind, appointment: &Appointment) {
        let event = AppointmentEvent {
            kind,
            appointment_id: appointment.id,
            appointment: Some(appointment.clone()),
        };

        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(
                "Published {:?} for appointment {} to {} subscribers",
                kind,
                appointment.id,
                receivers
            ),
            Err(_) => tracing::trace!("No subscribers for appointment {}", appointment.id),
        }
    }
}

/// Whether a dashboard with `scope` should see `event`.
pub fn visible_to(scope: &StaffScope, event: &AppointmentEvent) -> bool {
    match &event.appointment {
        Some(appointment) => scope.allows(&appointment.clinic),
        None => matches!(scope, StaffScope::Unscoped | StaffScope::Master),
    }
}
