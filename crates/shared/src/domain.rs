use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownKey;

macro_rules! keyed_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $key:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire key sent to the support backend.
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl FromStr for $name {
            type Err = UnknownKey;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($key => Ok($name::$variant),)+
                    other => Err(UnknownKey::new($kind, other)),
                }
            }
        }
    };
}

keyed_enum!(ProblemKind, "problem", {
    VideoNotOpening => "video_not_opening",
    TutorialNotOpening => "tutorial_not_opening",
    AccountNotCreated => "account_not_created",
    AccountLoginFailed => "account_login_failed",
});

keyed_enum!(FaqTopic, "faq", {
    ChangePassword => "change_password",
    DeleteAccount => "delete_account",
});

keyed_enum!(Feedback, "feedback", {
    Resolved => "resolved",
    Issues => "issues",
});

impl ProblemKind {
    pub fn label(self) -> &'static str {
        match self {
            ProblemKind::VideoNotOpening => "1. не открывается видео",
            ProblemKind::TutorialNotOpening => "2. не открывается интерактивный модуль",
            ProblemKind::AccountNotCreated => "3. не создаётся аккаунт",
            ProblemKind::AccountLoginFailed => "4. не получается зайти в аккаунт",
        }
    }
}

impl FaqTopic {
    pub fn question(self) -> &'static str {
        match self {
            FaqTopic::ChangePassword => "1. как поменять пароль для аккаунта?",
            FaqTopic::DeleteAccount => "2. как удалить аккаунт?",
        }
    }

    pub fn answer(self) -> &'static str {
        match self {
            FaqTopic::ChangePassword => {
                "Вы можете поменять пароль в настройках аккаунта. Нажмите кнопку «Перейти в настройки аккаунта» ниже и введите старый и новый пароли."
            }
            FaqTopic::DeleteAccount => {
                "Вы можете удалить аккаунт через страницу настроек аккаунта: в самом конце страницы есть кнопка удаления."
            }
        }
    }
}

impl Feedback {
    pub fn label(self) -> &'static str {
        match self {
            Feedback::Resolved => "Всё получилось",
            Feedback::Issues => "Возникли проблемы",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<InlineLink>,
}

impl ChatMessage {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Bot,
            text: text.into(),
            link: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, label: impl Into<String>, href: impl Into<String>) -> Self {
        self.link = Some(InlineLink {
            label: label.into(),
            href: href.into(),
        });
        self
    }
}
