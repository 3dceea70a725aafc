use tracing::info;

use crate::domain::entities::EventKind;
use crate::domain::errors::WebhookError;
use crate::domain::ports::{EventVerifier, WebhookEventHandler};

// Verifies a provider delivery and dispatches it by event type.
pub struct HandleWebhookUseCase<'a, V: ?Sized, H: ?Sized> {
    pub verifier: &'a V,
    pub handler: &'a H,
}

impl<V, H> HandleWebhookUseCase<'_, V, H>
where
    V: EventVerifier + ?Sized,
    H: WebhookEventHandler + ?Sized,
{
    pub async fn execute(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<EventKind, WebhookError> {
        let signature = signature.ok_or(WebhookError::MissingSignature)?;
        let event = self.verifier.construct_event(payload, signature)?;

        let outcome = match &event.kind {
            EventKind::PaymentIntentSucceeded => {
                self.handler.payment_intent_succeeded(&event.object).await
            }
            EventKind::PaymentIntentFailed => self.handler.payment_intent_failed(&event.object).await,
            EventKind::ChargeRefunded => self.handler.charge_refunded(&event.object).await,
            EventKind::ChargeRefundUpdated => {
                self.handler.charge_refund_updated(&event.object).await
            }
            EventKind::Other(kind) => {
                info!(event_id = %event.id, event_type = %kind, "unhandled event type");
                Ok(())
            }
        };

        outcome.map_err(WebhookError::HandlerFailed)?;
        Ok(event.kind)
    }
}
