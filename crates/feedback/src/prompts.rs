//! Instruction templates for the three generation calls made per submission.

pub fn user_response_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You are an AI assistant replying to customer feedback on behalf of a company.

The customer submitted:
Rating: {rating} stars
Review: "{review}"

Write a short, polite and empathetic reply addressed to the customer.
Match the tone to the rating: thank happy customers, apologise to unhappy ones.

Write only the reply text, with no analysis or preamble."#
    )
}

pub fn admin_summary_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You help an internal team review customer feedback.

Summarise the review below in one or two concise sentences.

Rating: {rating} stars
Review: "{review}"

Keep the summary factual and neutral. Do not add recommendations."#
    )
}

pub fn admin_action_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You advise a customer experience team.

Based on the feedback below, suggest one or two concrete next actions for the team.

Rating: {rating} stars
Review: "{review}"

Typical actions include following up with the customer, investigating an issue,
keeping the current service level, or recognising staff.

Be clear and brief."#
    )
}
