use loghive_search::{SearchDocument, SearchIndex};
use loghive_store::{Database, ProjectRecord, SessionRecord};
use loghive_types::{
    RenderableMessage, SessionWithProject, project_id_from_path,
};

use crate::Result;

/// Outcome of one dual-store write. `search_error` being set means the
/// primary store committed but the search rows did not; the import still
/// counts as successful.
#[derive(Debug)]
pub struct WriteOutcome {
    pub session_id: i64,
    pub search_error: Option<loghive_search::Error>,
}

/// Writes one normalized session to both stores.
///
/// The primary store is authoritative and written first; the search index
/// follows in its own transaction and is allowed to fail independently,
/// since it can always be rebuilt from the primary store.
pub struct DualWriter<'a> {
    db: &'a Database,
    index: &'a SearchIndex,
}

impl<'a> DualWriter<'a> {
    pub fn new(db: &'a Database, index: &'a SearchIndex) -> Self {
        Self { db, index }
    }

    pub fn write(&self, session: &SessionWithProject) -> Result<WriteOutcome> {
        let project_id = project_id_from_path(&session.project_path);

        let project = ProjectRecord {
            id: project_id.clone(),
            name: session.project_name.clone(),
            path: Some(session.project_path.clone()),
            created_at: non_empty(&session.created_at),
            updated_at: non_empty(&session.updated_at),
        };

        let detail = &session.detail;
        let record = SessionRecord {
            id: 0,
            project_id: project_id.clone(),
            provider: session.provider.clone(),
            external_id: detail.session_id.clone(),
            title: detail.title.clone(),
            version: detail.metadata.version.clone(),
            git_branch: detail.metadata.git_branch.clone(),
            cwd: detail.metadata.cwd.clone(),
            models: detail.metadata.models.clone(),
            message_count: detail.messages.len(),
            created_at: non_empty(&session.created_at),
            updated_at: non_empty(&session.updated_at),
        };

        let cards: Vec<RenderableMessage> = detail
            .messages
            .iter()
            .enumerate()
            .map(|(seq, message)| RenderableMessage::from_message(seq, message))
            .collect();

        let session_id = self.db.write_session(&project, &record, &cards)?;

        // Search rows in an independent transaction against the second
        // store; a failure here rolls back only the search side.
        let mut documents = Vec::new();
        let bodies: Vec<String> = detail.messages.iter().map(|m| m.search_text()).collect();
        for (card, body) in cards.iter().zip(&bodies) {
            if body.trim().is_empty() {
                continue;
            }
            documents.push(SearchDocument {
                session_id,
                project_id: &project_id,
                card_type: card.card_type.as_str(),
                session_title: &detail.title,
                project_name: &session.project_name,
                timestamp: &card.timestamp,
                body,
            });
        }

        let search_error = self.index.replace_session(session_id, &documents).err();

        Ok(WriteOutcome {
            session_id,
            search_error,
        })
    }

    /// Wipe and repopulate the search index from the primary store.
    pub fn rebuild_search_index(&self) -> Result<usize> {
        self.index.clear()?;
        let mut indexed = 0usize;

        for summary in self.db.list_all_sessions()? {
            let project_name = self
                .db
                .get_project(&summary.project_id)?
                .map(|p| p.name)
                .unwrap_or_default();
            let messages = self.db.get_messages(summary.id)?;

            let bodies: Vec<String> = messages
                .iter()
                .map(|m| {
                    let mut parts: Vec<&str> = Vec::new();
                    if let Some(title) = &m.title {
                        parts.push(title);
                    }
                    let content = loghive_types::blocks_to_text(&m.content);
                    if content.is_empty() && parts.is_empty() {
                        String::new()
                    } else {
                        format!("{} {}", parts.join(" "), content)
                            .trim()
                            .to_string()
                    }
                })
                .collect();

            let mut documents = Vec::new();
            for (message, body) in messages.iter().zip(&bodies) {
                if body.trim().is_empty() {
                    continue;
                }
                documents.push(SearchDocument {
                    session_id: summary.id,
                    project_id: &summary.project_id,
                    card_type: message.card_type.as_str(),
                    session_title: &summary.title,
                    project_name: &project_name,
                    timestamp: &message.timestamp,
                    body,
                });
            }
            indexed += documents.len();
            self.index.replace_session(summary.id, &documents)?;
        }

        Ok(indexed)
    }
}

fn non_empty(s: &str) -> Option<String> {
    Some(s.to_string()).filter(|s| !s.is_empty())
}
