use super::LLMMessage;

/// Turn markers and role names of a locally run chat model.
pub trait LocalLLMModel {
    fn start_of_turn(&self) -> String;
    fn end_of_turn(&self) -> String;
    fn system_name(&self) -> String;
    fn user_name(&self) -> String;
    fn assistant_name(&self) -> String;

    /// Tokens that end generation, `end_of_turn` first.
    fn stop_tokens(&self) -> Vec<String> {
        vec![self.end_of_turn()]
    }

    fn with_chat_template(&self, history: &[LLMMessage]) -> String {
        let prompt = history
            .iter()
            .map(|v| {
                let (role, content) = match v {
                    LLMMessage::System(v) => (self.system_name(), v),
                    LLMMessage::User(v) => (self.user_name(), v),
                    LLMMessage::Assistant(v) => (self.assistant_name(), v),
                };
                format!(
                    "{}{}\n{}{}\n",
                    self.start_of_turn(),
                    role,
                    content,
                    self.end_of_turn()
                )
            })
            .collect::<Vec<String>>()
            .join("");

        format!(
            "{}{}{}\n",
            prompt,
            self.start_of_turn(),
            self.assistant_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ChatML;

    impl LocalLLMModel for ChatML {
        fn start_of_turn(&self) -> String {
            "<|im_start|>".into()
        }
        fn end_of_turn(&self) -> String {
            "<|im_end|>".into()
        }
        fn system_name(&self) -> String {
            "system".into()
        }
        fn user_name(&self) -> String {
            "user".into()
        }
        fn assistant_name(&self) -> String {
            "assistant".into()
        }
    }

    struct Gemma;

    impl LocalLLMModel for Gemma {
        fn start_of_turn(&self) -> String {
            "<start_of_turn>".into()
        }
        fn end_of_turn(&self) -> String {
            "<end_of_turn>".into()
        }
        fn system_name(&self) -> String {
            "system".into()
        }
        fn user_name(&self) -> String {
            "user".into()
        }
        fn assistant_name(&self) -> String {
            "model".into()
        }
    }

    #[test]
    fn chatml_template() {
        let prompt = ChatML.with_chat_template(&[
            LLMMessage::System("You are helpful.".into()),
            LLMMessage::User("Who are you?".into()),
        ]);
        assert_eq!(
            prompt,
            "<|im_start|>system\nYou are helpful.<|im_end|>\n\
             <|im_start|>user\nWho are you?<|im_end|>\n\
             <|im_start|>assistant\n"
        );
    }

    #[test]
    fn multi_turn_uses_model_role_names() {
        let prompt = Gemma.with_chat_template(&[
            LLMMessage::User("hi".into()),
            LLMMessage::Assistant("hello".into()),
            LLMMessage::User("bye".into()),
        ]);
        assert_eq!(
            prompt,
            "<start_of_turn>user\nhi<end_of_turn>\n\
             <start_of_turn>model\nhello<end_of_turn>\n\
             <start_of_turn>user\nbye<end_of_turn>\n\
             <start_of_turn>model\n"
        );
    }

    #[test]
    fn empty_history_only_opens_assistant_turn() {
        assert_eq!(ChatML.with_chat_template(&[]), "<|im_start|>assistant\n");
        assert_eq!(ChatML.stop_tokens(), vec!["<|im_end|>".to_string()]);
    }
}
