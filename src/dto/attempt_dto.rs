use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One submission: the selected answer per question. A partial map is
/// accepted and graded against the number of pairs submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptPayload {
    pub answers: HashMap<Uuid, Uuid>,
}
