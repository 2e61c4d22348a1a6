// Exit codes for precise harness triage
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PLATFORM_FAIL: i32 = 2;
pub const EXIT_VERIFY_FAIL: i32 = 3;
