use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::store::StateStore;
use crate::trie::Trie;

/// A boxed, `Send` future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload; handlers downcast it.
pub type Payload = Arc<dyn Any + Send + Sync>;

type Handler = Arc<dyn Fn(String, Payload, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Routes request paths to async handlers.
///
/// Several handlers may match one path; they run one after another in
/// registration-trie order. A path with no handler is a no-op.
pub struct Router {
    handlers: Trie<Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            handlers: Trie::new(),
        }
    }

    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(
            move |path: String, payload: Payload, store: Arc<StateStore>| -> BoxFuture {
                Box::pin(handler(path, payload, store))
            },
        );
        self.handlers.insert(pattern, handler);
    }

    pub async fn dispatch(&self, path: &str, payload: Payload, store: Arc<StateStore>) {
        let handlers = self.handlers.matches(path);
        if handlers.is_empty() {
            debug!("flux: no handler for {}", path);
            return;
        }
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        !self.handlers.matches(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
