// Core algorithm exports
pub mod assembler;
pub mod evaluator;
pub mod filters;
pub mod matcher;

pub use assembler::assemble_output;
pub use evaluator::{evaluate, evaluate_with, EvaluationOptions, TrialCriteria};
pub use filters::{parse_age_eligibility, parse_condition_list, parse_sex_eligibility};
pub use matcher::{match_all, MatchResult, Matcher};
