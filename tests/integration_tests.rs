//! Integration tests for the hustlebot library.
//! The live test requires an API key in the environment to run.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use hustlebot::chat::{APOLOGY, ConversationController, Welcome, derive_title};
    use hustlebot::{API_KEY_ENV, Completion, Error, Gemini, GenerateContentRequest, Result};

    struct Canned(Mutex<VecDeque<Result<String>>>);

    impl Canned {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self(Mutex::new(replies.into()))
        }
    }

    #[async_trait::async_trait]
    impl Completion for Canned {
        async fn complete(&self, question: &str) -> Result<String> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("answer to {question}")))
        }
    }

    #[tokio::test]
    async fn test_live_generate_content() {
        let api_key = std::env::var(API_KEY_ENV).ok();
        if api_key.is_none() {
            eprintln!("Skipping test: {API_KEY_ENV} not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");
        let response = client
            .generate_content(&GenerateContentRequest::question("Say 'test passed'"))
            .await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
        assert!(response.unwrap().answer_text().is_ok());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let mut controller = ConversationController::with_welcome(
            Canned::new(vec![
                Ok("Rise early.".to_string()),
                Err(Error::timeout("slow", None)),
            ]),
            Welcome::new("HustleBot", "Welcome!"),
        );

        controller
            .ask("What is the single best habit for a founder to build?")
            .await
            .unwrap();
        let title = controller.current().title().unwrap().to_string();
        assert_eq!(title, "What is the single best habit ...");

        let failed = controller.ask("And then?").await.unwrap();
        assert_eq!(failed.answer(), APOLOGY);

        controller.start_new_session();
        assert_eq!(controller.archived().len(), 1);
        assert_eq!(controller.archived()[0].len(), 3);
        assert_eq!(controller.current().len(), 1);
        assert_eq!(controller.current().title(), None);

        controller.ask("").await.unwrap();
        assert_eq!(controller.current().title(), Some("Session 2"));

        controller.switch_session(0).unwrap();
        assert_eq!(controller.current().title(), Some(title.as_str()));
        assert_eq!(controller.archived().len(), 2);

        let removed = controller.delete_session(1).unwrap();
        assert_eq!(removed.title(), Some("Session 2"));
        assert_eq!(controller.archived().len(), 1);
        assert!(controller.delete_session(5).unwrap_err().is_not_found());
    }

    #[test]
    fn test_titles_count_characters() {
        assert_eq!(derive_title("短い質問", 1), "短い質問...");
        assert_eq!(derive_title("", 4), "Session 4");
    }
}
