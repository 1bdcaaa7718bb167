//! DTOs for the JSONPlaceholder wire format.
//!
//! Responses carry many more fields (names, addresses, companies) than the
//! screen uses; serde ignores them.

use serde::{Deserialize, Serialize};

use crate::domain::{NewUser, Post, User, UserId};

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: u64,
    pub(super) username: String,
    #[serde(default)]
    pub(super) email: String,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self::new(UserId::new(dto.id), dto.username, dto.email)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PostDto {
    pub(super) id: u64,
    #[serde(rename = "userId")]
    pub(super) user_id: u64,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) body: String,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Self::new(dto.id, UserId::new(dto.user_id), dto.title, dto.body)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewUserDto<'a> {
    pub(super) username: &'a str,
    pub(super) email: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserDto<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            username: user.username(),
            email: user.email(),
        }
    }
}
