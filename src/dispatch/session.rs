use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use serde_json::Value;

/// Requests a procedure can leave for the loop that owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopRequest {
    Exit,
    Reload,
}

/// Loop-owned state handed to every procedure invocation.
///
/// Holds the output sink, the value store shared between plugins and any
/// pending loop request. The dispatcher itself keeps no state between calls.
pub struct Session {
    output: Box<dyn Write>,
    values: BTreeMap<String, Value>,
    request: Option<LoopRequest>,
}

impl Default for Session {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Session {
    pub fn new(output: impl Write + 'static) -> Self {
        Self {
            output: Box::new(output),
            values: BTreeMap::new(),
            request: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.values
    }

    /// Records a request; the latest one wins.
    pub fn request(&mut self, request: LoopRequest) {
        self.request = Some(request);
    }

    pub fn take_request(&mut self) -> Option<LoopRequest> {
        self.request.take()
    }
}
