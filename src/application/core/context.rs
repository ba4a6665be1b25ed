/// Per-request caller context, passed explicitly into every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated user id (JWT subject), if any
    pub user_id: Option<String>,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: Some(user_id.into()),
            request_id: None,
        }
    }

    pub fn with_request_id<S: Into<String>>(mut self, request_id: S) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
