//! Request-scoped authentication context for GraphQL resolvers
//!
//! The HTTP handler resolves the bearer token once per request and inserts the
//! resulting [CurrentUser] into the request data. Resolvers read it back with
//! [AuthExt::current_user] and hand it to the domain services, which decide
//! whether authentication is required.

use async_graphql::Context;

use crate::services::CurrentUser;

/// Extension trait to get the acting user from GraphQL context
pub trait AuthExt {
    /// The authenticated user, or None for anonymous requests
    fn current_user(&self) -> Option<&CurrentUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.data_opt::<CurrentUser>()
    }
}
