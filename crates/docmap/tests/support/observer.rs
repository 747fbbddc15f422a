use docmap::{async_trait, bson::Bson, Error, ExecuteContext, Observer, Response, Result};

use std::sync::{Arc, Mutex};

/// One observer notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub hook: &'static str,
    pub model: String,
    pub collection: String,
    pub command: &'static str,
    pub native_command: &'static str,

    /// Kind of the response seen by `after_execute`
    pub response: Option<&'static str>,

    pub failed: bool,
}

/// Records every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Legacy command names seen by `before_execute`, in order.
    pub fn commands(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter(|event| event.hook == "before")
            .map(|event| event.command)
            .collect()
    }

    fn record(&self, hook: &'static str, cx: &ExecuteContext) {
        self.events.lock().unwrap().push(Event {
            hook,
            model: cx.model.clone(),
            collection: cx.collection.clone(),
            command: cx.command,
            native_command: cx.native_command,
            response: cx.res.as_ref().map(Response::kind),
            failed: cx.error.is_some(),
        });
    }
}

#[async_trait]
impl Observer for Recorder {
    async fn before_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        self.record("before", cx);
        cx.hook_state.insert("seen", Bson::Boolean(true));
        Ok(())
    }

    async fn after_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        assert_eq!(cx.hook_state.get_bool("seen").ok(), Some(true));
        self.record("after", cx);
        Ok(())
    }
}

/// Answers every command with a fixed response, skipping the native call.
#[derive(Debug, Clone)]
pub struct Canned(pub Response);

#[async_trait]
impl Observer for Canned {
    async fn before_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        cx.res = Some(self.0.clone());
        Ok(())
    }
}

/// Fails every command before it runs.
#[derive(Debug, Clone)]
pub struct Reject;

#[async_trait]
impl Observer for Reject {
    async fn before_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        Err(Error::invalid_result(format!("{} rejected", cx.native_command)))
    }
}
