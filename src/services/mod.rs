pub mod content_processor;
pub mod model_service;
pub mod prompt_builder;
pub mod quiz_grading_service;
pub mod quiz_response_parser;
pub mod study_service;
pub mod user_service;
