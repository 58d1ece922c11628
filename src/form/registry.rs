use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use super::controller::{FormController, FormSettings};
use crate::subscription_service::SubscriptionService;

struct FormEntry {
    controller: Arc<FormController>,
    last_touched: Instant,
}

/// One controller per visitor that actually submitted, keyed by form id.
///
/// All controllers share the same subscription service and settings.
/// Forms untouched for longer than `idle_ttl` are dropped on the next
/// insert.
pub struct FormRegistry {
    forms: Mutex<HashMap<Uuid, FormEntry>>,
    service: Arc<dyn SubscriptionService>,
    settings: FormSettings,
    idle_ttl: Duration,
}

impl FormRegistry {
    pub fn new(
        service: Arc<dyn SubscriptionService>,
        settings: FormSettings,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            forms: Mutex::new(HashMap::new()),
            service,
            settings,
            idle_ttl,
        }
    }

    /// Look up a form without creating one.
    pub async fn get(&self, form_id: Uuid) -> Option<Arc<FormController>> {
        let mut forms = self.forms.lock().await;
        forms.get_mut(&form_id).map(|entry| {
            entry.last_touched = Instant::now();
            entry.controller.clone()
        })
    }

    pub async fn get_or_create(&self, form_id: Uuid) -> Arc<FormController> {
        let mut forms = self.forms.lock().await;
        let now = Instant::now();
        Self::evict_idle(&mut forms, now, self.idle_ttl);

        let entry = forms.entry(form_id).or_insert_with(|| {
            tracing::debug!(%form_id, "creating newsletter form");
            FormEntry {
                controller: Arc::new(FormController::new(
                    self.service.clone(),
                    self.settings,
                )),
                last_touched: now,
            }
        });
        entry.last_touched = now;
        entry.controller.clone()
    }

    pub async fn len(&self) -> usize {
        self.forms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.forms.lock().await.is_empty()
    }

    /// Tear down every form, cancelling in-flight submissions and resets.
    pub async fn shutdown(&self) {
        let forms: Vec<_> = self.forms.lock().await.drain().collect();
        for (_, entry) in forms {
            entry.controller.shutdown().await;
        }
    }

    // Dropping the last handle on a controller aborts its tasks.
    fn evict_idle(forms: &mut HashMap<Uuid, FormEntry>, now: Instant, idle_ttl: Duration) {
        let before = forms.len();
        forms.retain(|_, entry| now.duration_since(entry.last_touched) < idle_ttl);

        let evicted = before - forms.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle newsletter forms");
        }
    }
}
