mod answer;
mod ids;
mod practice;
mod question;
mod result;
mod session;
mod test;
pub mod text;

pub use answer::{AnswerError, QuestionStatus, UserAnswer};
pub use ids::{ParseIdError, QuestionId, TestId, UserId};
pub use practice::{PracticeAnswer, PracticeSession, PracticeStatus, PracticeSummary};
pub use question::{OptionKey, Question, QuestionError};
pub use result::{SubmitSummary, TestResult};
pub use session::{SessionError, SessionState, TickOutcome};
pub use test::{Test, TestError, TestStatus};
pub use text::{Bilingual, Language, TextError};
