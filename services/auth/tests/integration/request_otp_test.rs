use chrono::Duration;

use workshop_auth::domain::clock::Clock;
use workshop_auth::domain::types::Role;
use workshop_auth::error::AuthServiceError;
use workshop_auth::usecase::request_otp::{RequestOtpInput, RequestOtpUseCase};

use crate::helpers::{ManualClock, MockMailer, MockOtpRepo, MockSignupRepo, test_policy, test_user};

fn input(email: &str) -> RequestOtpInput {
    RequestOtpInput {
        name: "Ana".to_owned(),
        email: email.to_owned(),
        password: "correct-horse".to_owned(),
        role: "contractor".to_owned(),
    }
}

fn usecase(
    signups: MockSignupRepo,
    otps: MockOtpRepo,
    mailer: MockMailer,
    clock: ManualClock,
) -> RequestOtpUseCase<MockSignupRepo, MockOtpRepo, MockMailer, ManualClock> {
    RequestOtpUseCase {
        signups,
        otps,
        mailer,
        clock,
        policy: test_policy(),
    }
}

#[tokio::test]
async fn should_issue_otp_and_upsert_pending_signup() {
    let otps = MockOtpRepo::empty();
    let signups = MockSignupRepo::sharing_otps_with(&otps);
    let mailer = MockMailer::working();
    let clock = ManualClock::start_of_test();

    let codes = otps.codes_handle();
    let pendings = signups.pendings_handle();
    let sent = mailer.sent_handle();

    let uc = usecase(signups, otps, mailer, clock.clone());
    let output = uc.execute(input("a@b.com")).await.unwrap();

    assert_eq!(output.resend_cooldown_seconds, 60);
    assert_eq!(output.expires_at, clock.now() + Duration::minutes(5));

    let pendings = pendings.lock().unwrap();
    assert_eq!(pendings.len(), 1);
    assert_eq!(pendings[0].role, Role::Contractor);
    assert!(
        !pendings[0].password_hash.contains("correct-horse"),
        "password must be stored hashed"
    );

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].attempts, 0);
    assert!(!codes[0].consumed);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "a@b.com");
    assert_eq!(sent[0].1.len(), 6, "mailed code should be 6 digits");
    assert!(
        !codes[0].code_hash.contains(&sent[0].1),
        "plaintext code must not appear in the stored hash"
    );
}

#[tokio::test]
async fn should_leave_exactly_one_active_record_after_reissue() {
    let otps = MockOtpRepo::empty();
    let signups = MockSignupRepo::sharing_otps_with(&otps);
    let codes = otps.codes_handle();
    let clock = ManualClock::start_of_test();

    let uc = usecase(signups, otps, MockMailer::working(), clock.clone());
    uc.execute(input("a@b.com")).await.unwrap();
    clock.advance(Duration::seconds(90));
    uc.execute(input("a@b.com")).await.unwrap();

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 2);
    let active: Vec<_> = codes.iter().filter(|c| !c.consumed).collect();
    assert_eq!(active.len(), 1, "reissue must invalidate the prior record");
    assert_eq!(active[0].created_at, clock.now());
}

#[tokio::test]
async fn should_reject_before_mutating_on_bad_input() {
    let cases = [
        (input("not-an-email"), "INVALID_EMAIL"),
        (
            RequestOtpInput {
                password: "short".to_owned(),
                ..input("a@b.com")
            },
            "WEAK_PASSWORD",
        ),
        (
            RequestOtpInput {
                role: "admin".to_owned(),
                ..input("a@b.com")
            },
            "INVALID_ROLE",
        ),
    ];

    for (bad_input, expected_kind) in cases {
        let otps = MockOtpRepo::empty();
        let signups = MockSignupRepo::sharing_otps_with(&otps);
        let pendings = signups.pendings_handle();
        let codes = otps.codes_handle();

        let uc = usecase(
            signups,
            otps,
            MockMailer::working(),
            ManualClock::start_of_test(),
        );
        let err = uc.execute(bad_input).await.unwrap_err();
        assert_eq!(err.kind(), expected_kind);
        assert!(pendings.lock().unwrap().is_empty(), "no mutation expected");
        assert!(codes.lock().unwrap().is_empty(), "no mutation expected");
    }
}

#[tokio::test]
async fn should_conflict_when_email_already_registered() {
    let otps = MockOtpRepo::empty();
    let signups = MockSignupRepo::sharing_otps_with(&otps)
        .with_users(vec![test_user("a@b.com", "pw-irrelevant", Role::Supplier)]);

    let uc = usecase(
        signups,
        otps,
        MockMailer::working(),
        ManualClock::start_of_test(),
    );
    let result = uc.execute(input("a@b.com")).await;
    assert!(
        matches!(result, Err(AuthServiceError::AlreadyRegistered)),
        "expected AlreadyRegistered, got {result:?}"
    );
}

#[tokio::test]
async fn should_surface_email_send_failure_distinctly() {
    let otps = MockOtpRepo::empty();
    let signups = MockSignupRepo::sharing_otps_with(&otps);
    let codes = otps.codes_handle();

    let uc = usecase(
        signups,
        otps,
        MockMailer::failing(),
        ManualClock::start_of_test(),
    );
    let err = uc.execute(input("a@b.com")).await.unwrap_err();
    assert_eq!(err.kind(), "EMAIL_SEND_FAILED");

    // The record is written before delivery is attempted; a retry of the
    // whole flow will invalidate and replace it.
    assert_eq!(codes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_overwrite_pending_signup_on_repeat_request() {
    let otps = MockOtpRepo::empty();
    let signups = MockSignupRepo::sharing_otps_with(&otps);
    let pendings = signups.pendings_handle();
    let clock = ManualClock::start_of_test();

    let uc = usecase(signups, otps, MockMailer::working(), clock.clone());
    uc.execute(input("a@b.com")).await.unwrap();
    clock.advance(Duration::seconds(120));
    uc.execute(RequestOtpInput {
        role: "supplier".to_owned(),
        ..input("a@b.com")
    })
    .await
    .unwrap();

    let pendings = pendings.lock().unwrap();
    assert_eq!(pendings.len(), 1, "upsert, not duplicate");
    assert_eq!(pendings[0].role, Role::Supplier);
}
