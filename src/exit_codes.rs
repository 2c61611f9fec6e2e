//! Exit code constants for the jiradraft CLI.
//!
//! - 0: Success
//! - 1: User or configuration error (bad args, missing key, nothing to analyze)
//! - 2: Generation failure (model never produced a valid task)
//! - 3: Git operation failure
//! - 4: Model invocation failure (network, auth, provider)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or no changes to analyze.
pub const USER_ERROR: i32 = 1;

/// Generation failure: invalid model output after the repair attempt, or storage failure.
pub const GENERATION_FAILURE: i32 = 2;

/// Git operation failure: diff or branch lookup failed.
pub const GIT_FAILURE: i32 = 3;

/// Model failure: transport, authentication, or provider error.
pub const MODEL_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, GENERATION_FAILURE, GIT_FAILURE, MODEL_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
