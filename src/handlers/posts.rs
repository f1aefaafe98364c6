//! HTTP handlers for the feed
//!
//! The post-creation path persists first and only then hands the post to the
//! relay's new-post broadcast; a failed persist is surfaced to the HTTP
//! caller and broadcast to no one. Image upload and authentication live in
//! front of this service, so the request carries an already-resolved image
//! URL and the author's user id.

use std::convert::Infallible;

use log::{error, info};
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;

use crate::core::server::SharedServerManager;
use crate::storage::traits::{FeedStore, Post};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_id: String,
    pub image_url: String,
    pub caption: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// POST /api/posts
pub async fn create_post(
    request: CreatePostRequest,
    server: SharedServerManager,
) -> Result<impl warp::Reply, Infallible> {
    let post = Post::new(request.user_id, request.image_url, request.caption);

    match server.store().create_post(post).await {
        Ok(post) => {
            info!("Post created: {}", post.id);
            server.publish_new_post(post.clone()).await;
            Ok(warp::reply::with_status(
                warp::reply::json(&post),
                StatusCode::CREATED,
            ))
        }
        Err(e) => {
            error!("Failed to persist post: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    message: e.to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// GET /api/posts
pub async fn list_posts(server: SharedServerManager) -> Result<impl warp::Reply, Infallible> {
    match server.store().list_posts().await {
        Ok(posts) => Ok(warp::reply::with_status(
            warp::reply::json(&posts),
            StatusCode::OK,
        )),
        Err(e) => {
            error!("Failed to list posts: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    message: e.to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
