// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use msgcommon::identifiers::SessionId;
use parking_lot::RwLock;

/// Distributor chosen by each session
#[derive(Debug, Default)]
pub struct UnifiedPushStore {
    distributors: RwLock<HashMap<SessionId, String>>,
}

impl UnifiedPushStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distributor_value(&self, session_id: &SessionId) -> Option<String> {
        self.distributors.read().get(session_id).cloned()
    }

    pub fn set_distributor_value(&self, session_id: &SessionId, value: Option<String>) {
        let mut distributors = self.distributors.write();
        match value {
            Some(value) => {
                distributors.insert(session_id.clone(), value);
            }
            None => {
                distributors.remove(session_id);
            }
        }
    }
}
