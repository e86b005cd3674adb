use crate::models::chat::{ Role, Turn };

/// Role given to the earliest prior message. Roles then alternate by position.
pub const ANCHOR_ROLE: Role = Role::User;

/// Role of the prior message at `index`, counting from the oldest.
pub fn role_at(index: usize) -> Role {
    if index % 2 == 0 {
        ANCHOR_ROLE
    } else {
        match ANCHOR_ROLE {
            Role::User => Role::Assistant,
            Role::Assistant => Role::User,
        }
    }
}

/// Splits a chronological message list into prior turns and the current query.
///
/// Returns `None` only for an empty list. For `n` messages the history holds
/// `n - 1` turns in input order and the query is the last message.
pub fn build_chat_history(messages: &[String]) -> Option<(Vec<Turn>, &str)> {
    let (query, prior) = messages.split_last()?;
    let history = prior
        .iter()
        .enumerate()
        .map(|(i, content)| Turn::new(role_at(i), content.clone()))
        .collect();
    Some((history, query.as_str()))
}
