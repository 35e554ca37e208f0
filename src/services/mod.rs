//! Domain services behind the GraphQL resolvers

pub mod auth;
pub mod catalog;

pub use auth::{
    ACCEPTED_PASSWORD, AuthConfig, AuthService, CreateUserArgs, CurrentUser, LoginArgs,
    TokenClaims, bearer_token,
};
pub use catalog::{AddBookArgs, BookFilter, BookWithAuthor, CatalogService, EditAuthorArgs};
