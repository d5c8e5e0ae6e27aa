use indicatif::ProgressStyle;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const STAGE_TEMPLATE: &str = "{spinner} {msg:40} {wide_bar:} {pos:>2}/{len:2} stages";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn only_message() -> ProgressStyle {
        ProgressStyle::with_template(ONLY_MESSAGE_TEMPLATE).expect("static progress template")
    }

    pub fn stage_bar() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_TEMPLATE)
            .expect("static progress template")
            .progress_chars("#>-")
    }
}
