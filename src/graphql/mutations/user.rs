use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
    ) -> Result<Option<User>> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let user = auth
            .create_user(CreateUserArgs {
                username,
                favorite_genre,
            })
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(user.into()))
    }

    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let value = auth
            .login(LoginArgs { username, password })
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(Token { value }))
    }
}
