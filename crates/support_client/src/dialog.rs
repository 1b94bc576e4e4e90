//! Support dialog tree: screens, the actions each screen offers and what
//! every action does. Rendering-free; [`crate::widget::ChatWidget`] drives it.

use shared::{
    domain::{ChatMessage, FaqTopic, Feedback, ProblemKind},
    protocol::SupportRequest,
};

pub const GREETING: &str = "Здравствуйте. Это чат поддержки. Выберите, что вам нужно.";
pub const PROBLEM_MENU_PROMPT: &str =
    "Выберите одну из проблем. Я отправлю сообщение разработчикам сайта.";
pub const FAQ_MENU_PROMPT: &str = "Выберите вопрос.";
pub const FAQ_LINK_PROMPT: &str = "Нажмите на эту ссылку:";
pub const UNKNOWN_FAQ_MESSAGE: &str = "Не удалось открыть этот вопрос.";

pub const ACCOUNT_SETTINGS_LABEL: &str = "Перейти в настройки аккаунта";
pub const ACCOUNT_SETTINGS_HREF: &str = "/account/";

const REPORT_PROBLEM_LABEL: &str = "Пожаловаться на проблему";
const OTHER_QUESTIONS_LABEL: &str = "Прочие вопросы";
const BACK_LABEL: &str = "Назад";
const BACK_TO_MENU_ECHO: &str = "Возврат в меню";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogNode {
    Root,
    ProblemMenu,
    FaqMenu,
    FaqAnswer(FaqTopic),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    OpenProblems,
    OpenFaq,
    ReportProblem(ProblemKind),
    OpenFaqAnswer(FaqTopic),
    SendFaqFeedback(FaqTopic, Feedback),
    BackToRoot,
    BackToFaq,
}

/// What selecting an action leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Navigate(DialogNode),
    /// Leaf action: the request is sent, then the dialog returns to the root.
    Submit(SupportRequest),
}

impl ChatAction {
    /// User-role message echoed into the log when the action is chosen.
    pub fn echo(&self) -> Option<&'static str> {
        match self {
            ChatAction::OpenProblems => Some(REPORT_PROBLEM_LABEL),
            ChatAction::OpenFaq => Some(OTHER_QUESTIONS_LABEL),
            ChatAction::ReportProblem(problem) => Some(problem.label()),
            ChatAction::OpenFaqAnswer(topic) => Some(topic.question()),
            ChatAction::SendFaqFeedback(_, feedback) => Some(feedback.label()),
            ChatAction::BackToRoot => Some(BACK_TO_MENU_ECHO),
            ChatAction::BackToFaq => None,
        }
    }

    pub fn step(&self) -> Step {
        match *self {
            ChatAction::OpenProblems => Step::Navigate(DialogNode::ProblemMenu),
            ChatAction::OpenFaq | ChatAction::BackToFaq => Step::Navigate(DialogNode::FaqMenu),
            ChatAction::OpenFaqAnswer(topic) => Step::Navigate(DialogNode::FaqAnswer(topic)),
            ChatAction::BackToRoot => Step::Navigate(DialogNode::Root),
            ChatAction::ReportProblem(problem) => {
                Step::Submit(SupportRequest::ReportProblem { problem })
            }
            ChatAction::SendFaqFeedback(faq, feedback) => {
                Step::Submit(SupportRequest::FaqFeedback { faq, feedback })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVariant {
    Primary,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Button(ChatAction),
    Link { href: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionItem {
    pub label: &'static str,
    pub variant: ActionVariant,
    pub target: ActionTarget,
}

impl ActionItem {
    fn button(label: &'static str, variant: ActionVariant, action: ChatAction) -> Self {
        Self {
            label,
            variant,
            target: ActionTarget::Button(action),
        }
    }

    fn link(label: &'static str, href: &'static str) -> Self {
        Self {
            label,
            variant: ActionVariant::Ghost,
            target: ActionTarget::Link { href },
        }
    }

    pub fn action(&self) -> Option<ChatAction> {
        match self.target {
            ActionTarget::Button(action) => Some(action),
            ActionTarget::Link { .. } => None,
        }
    }
}

pub fn actions_for(node: DialogNode) -> Vec<ActionItem> {
    use ActionVariant::{Ghost, Primary};

    match node {
        DialogNode::Root => vec![
            ActionItem::button(REPORT_PROBLEM_LABEL, Primary, ChatAction::OpenProblems),
            ActionItem::button(OTHER_QUESTIONS_LABEL, Ghost, ChatAction::OpenFaq),
        ],
        DialogNode::ProblemMenu => {
            let mut items: Vec<_> = ProblemKind::ALL
                .iter()
                .map(|problem| {
                    ActionItem::button(problem.label(), Primary, ChatAction::ReportProblem(*problem))
                })
                .collect();
            items.push(ActionItem::button(BACK_LABEL, Ghost, ChatAction::BackToRoot));
            items
        }
        DialogNode::FaqMenu => {
            let mut items: Vec<_> = FaqTopic::ALL
                .iter()
                .map(|topic| {
                    ActionItem::button(topic.question(), Ghost, ChatAction::OpenFaqAnswer(*topic))
                })
                .collect();
            items.push(ActionItem::button(BACK_LABEL, Ghost, ChatAction::BackToRoot));
            items
        }
        DialogNode::FaqAnswer(topic) => vec![
            ActionItem::link(ACCOUNT_SETTINGS_LABEL, ACCOUNT_SETTINGS_HREF),
            ActionItem::button(
                Feedback::Resolved.label(),
                Primary,
                ChatAction::SendFaqFeedback(topic, Feedback::Resolved),
            ),
            ActionItem::button(
                Feedback::Issues.label(),
                Ghost,
                ChatAction::SendFaqFeedback(topic, Feedback::Issues),
            ),
            ActionItem::button(BACK_LABEL, Ghost, ChatAction::BackToFaq),
        ],
    }
}

/// Bot messages shown when `node` is entered through navigation.
pub fn entry_messages(node: DialogNode) -> Vec<ChatMessage> {
    match node {
        DialogNode::Root => Vec::new(),
        DialogNode::ProblemMenu => vec![ChatMessage::bot(PROBLEM_MENU_PROMPT)],
        DialogNode::FaqMenu => vec![ChatMessage::bot(FAQ_MENU_PROMPT)],
        DialogNode::FaqAnswer(topic) => vec![
            ChatMessage::bot(topic.answer()),
            ChatMessage::bot(FAQ_LINK_PROMPT).with_link(ACCOUNT_SETTINGS_LABEL, ACCOUNT_SETTINGS_HREF),
        ],
    }
}

pub fn offers(node: DialogNode, action: ChatAction) -> bool {
    actions_for(node)
        .iter()
        .any(|item| item.action() == Some(action))
}
