//! GraphQL documents sent by the browser client.
//!
//! Kept next to the server so the test suite can check every document still
//! validates and executes against the schema.

/// Local-storage key the client keeps its bearer token under
pub const TOKEN_STORAGE_KEY: &str = "library-user-token";

pub const ALL_AUTHORS: &str = r#"
query {
  allAuthors {
    name
    born
    bookCount
  }
}
"#;

pub const ALL_BOOKS: &str = r#"
query {
  allBooks {
    title
    author {
      name
      born
      bookCount
    }
    published
  }
}
"#;

pub const BOOKS_BY_GENRE: &str = r#"
query booksByGenre($genre: String!) {
  allBooks(genre: $genre) {
    title
    author {
      name
    }
    published
    genres
  }
}
"#;

pub const CREATE_BOOK: &str = r#"
mutation createBook($title: String!, $author: String!, $published: Int!, $genres: [String!]!) {
  addBook(
    title: $title,
    author: $author,
    published: $published,
    genres: $genres
  ) {
    title
    author {
      name
    }
    published
    genres
  }
}
"#;

pub const SET_BIRTHYEAR: &str = r#"
mutation setBirthyear($name: String!, $born: Int!) {
  editAuthor(
    name: $name,
    setBornTo: $born
  ) {
    name
    born
    bookCount
  }
}
"#;

pub const LOGIN: &str = r#"
mutation login($username: String!, $password: String!) {
  login(username: $username, password: $password) {
    value
  }
}
"#;

pub const ME: &str = r#"
query {
  me {
    username
    favoriteGenre
  }
}
"#;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::{Request, Variables};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::db::{CreateUser, Database};
    use crate::graphql::{CatalogSchema, build_schema};
    use crate::services::{AuthConfig, AuthService, CatalogService, CurrentUser};

    async fn setup() -> (CatalogSchema, CurrentUser) {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let user = db
            .users()
            .create(CreateUser {
                username: "martin".to_string(),
                favorite_genre: "refactoring".to_string(),
            })
            .await
            .unwrap();
        let auth = Arc::new(AuthService::new(
            db.clone(),
            AuthConfig {
                jwt_secret: "client-secret".to_string(),
            },
        ));
        let schema = build_schema(Arc::new(CatalogService::new(db)), auth);
        (schema, CurrentUser(user))
    }

    async fn execute(
        schema: &CatalogSchema,
        document: &str,
        variables: Value,
        user: Option<&CurrentUser>,
    ) -> Value {
        let mut request = Request::new(document).variables(Variables::from_json(variables));
        if let Some(user) = user {
            request = request.data(user.clone());
        }
        let response = schema.execute(request).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn test_client_flow() {
        let (schema, user) = setup().await;

        let token = execute(
            &schema,
            LOGIN,
            json!({ "username": "martin", "password": "password" }),
            None,
        )
        .await;
        assert!(token["login"]["value"].is_string());

        let me = execute(&schema, ME, json!({}), Some(&user)).await;
        assert_eq!(
            me["me"],
            json!({ "username": "martin", "favoriteGenre": "refactoring" })
        );

        let created = execute(
            &schema,
            CREATE_BOOK,
            json!({
                "title": "Refactoring, edition 2",
                "author": "Martin Fowler",
                "published": 2018,
                "genres": ["refactoring"]
            }),
            Some(&user),
        )
        .await;
        assert_eq!(created["addBook"]["author"]["name"], json!("Martin Fowler"));

        let edited = execute(
            &schema,
            SET_BIRTHYEAR,
            json!({ "name": "Martin Fowler", "born": 1963 }),
            Some(&user),
        )
        .await;
        assert_eq!(
            edited["editAuthor"],
            json!({ "name": "Martin Fowler", "born": 1963, "bookCount": 1 })
        );

        let authors = execute(&schema, ALL_AUTHORS, json!({}), None).await;
        assert_eq!(
            authors["allAuthors"],
            json!([{ "name": "Martin Fowler", "born": 1963, "bookCount": 1 }])
        );

        let books = execute(&schema, ALL_BOOKS, json!({}), None).await;
        assert_eq!(books["allBooks"][0]["published"], json!(2018));

        let by_genre = execute(&schema, BOOKS_BY_GENRE, json!({ "genre": "refactoring" }), None).await;
        assert_eq!(by_genre["allBooks"].as_array().map(Vec::len), Some(1));
        let none = execute(&schema, BOOKS_BY_GENRE, json!({ "genre": "crime" }), None).await;
        assert_eq!(none["allBooks"], json!([]));
    }
}
