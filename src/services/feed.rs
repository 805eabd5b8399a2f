// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed interactions with optimistic local updates.

use crate::error::AppError;
use crate::models::{Comment, Hit};
use crate::services::MarketplaceClient;

/// Flip the like on `hit` locally, then tell the server.
///
/// If the request fails the local change is rolled back and the error
/// returned. Returns the new liked state on success.
pub async fn toggle_like(client: &MarketplaceClient, hit: &mut Hit) -> Result<bool, AppError> {
    let liked = !hit.is_liked;
    apply_like(hit, liked);

    let result = if liked {
        client.like_listing(hit.id).await
    } else {
        client.unlike_listing(hit.id).await
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, hit_id = hit.id, liked, "Like update failed, reverting");
        apply_like(hit, !liked);
        return Err(e);
    }

    Ok(liked)
}

fn apply_like(hit: &mut Hit, liked: bool) {
    hit.is_liked = liked;
    hit.likes_count = if liked {
        hit.likes_count.saturating_add(1)
    } else {
        hit.likes_count.saturating_sub(1)
    };
}

/// Post a comment on `hit`. Blank text is rejected without a request.
pub async fn post_comment(
    client: &MarketplaceClient,
    hit: &mut Hit,
    text: &str,
) -> Result<Comment, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Comment cannot be empty".to_string()));
    }

    let comment = client.post_comment(hit.id, text).await?;
    hit.comments_count = hit.comments_count.saturating_add(1);
    tracing::debug!(hit_id = hit.id, comment_id = comment.id, "Comment posted");
    Ok(comment)
}

/// Hits whose title contains `query`, ignoring case. A blank query matches
/// nothing.
pub fn search_hits<'a>(hits: &'a [Hit], query: &str) -> Vec<&'a Hit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    hits.iter()
        .filter(|h| h.item_title.to_lowercase().contains(&needle))
        .collect()
}
