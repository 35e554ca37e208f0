use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The current authenticated user, or null
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.current_user().map(|user| User::from(user.0.clone()))
    }
}
