//! Handler for the `question-id` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::QuestionIdArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::QuestionId;

/// Execute `question-id`.
pub fn execute(args: &QuestionIdArgs) {
    let id = QuestionId::derive(&args.question, args.creator, args.oracle);

    if output::is_json() {
        output::result(json!({ "questionId": id }));
        return;
    }

    output::field("Question ID", output::highlight(id));
}
