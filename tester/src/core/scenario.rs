//! Scenario definition: the ordered list of steps
//!
//! Order is execution order. Later steps depend on values earlier steps put
//! into the session context:
//! Register → Verify → Login → Profile → List → Borrow → Return → History.
//! The "(Fail)" steps exercise negative paths and leave the context alone.

use rand::Rng;
use serde_json::json;

use shared::{Expectation, HttpMethod};
use crate::error::{TesterError, TesterResult};
use crate::types::{Capture, Step, StepAction};

/// Default base URL of the library service
pub const DEFAULT_BASE_URL: &str = "https://pushtaka.xapi.my.id";

/// Password registered by the success path and reused for login
pub const TEST_PASSWORD: &str = "Password123!";

/// OTP shortcut accepted by the test deployment
pub const SHORTCUT_OTP: &str = "123456";

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    steps: Vec<Step>,
    /// Registration address, redrawn for every new session when generated
    email: Option<RegistrationEmail>,
}

#[derive(Debug, Clone, PartialEq)]
struct RegistrationEmail {
    address: String,
    generated: bool,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> TesterResult<Self> {
        if steps.is_empty() {
            return Err(TesterError::EmptyScenario);
        }
        Ok(Self { steps, email: None })
    }

    /// Library flow with a freshly generated registration address
    pub fn library_flow() -> Self {
        Self::library_flow_from(generate_test_email(), true)
    }

    /// Library flow registering the given address
    pub fn library_flow_with_email(email: impl Into<String>) -> Self {
        Self::library_flow_from(email.into(), false)
    }

    fn library_flow_from(address: String, generated: bool) -> Self {
        Self {
            steps: library_steps(address.clone()),
            email: Some(RegistrationEmail { address, generated }),
        }
    }

    /// Scenario for a session started over after a reset
    ///
    /// A generated address has been registered by the previous run, so a
    /// different one is drawn. A fixed address is kept.
    pub fn for_new_session(&self) -> Self {
        match &self.email {
            Some(email) if email.generated => {
                let mut address = generate_test_email();
                while address == email.address {
                    address = generate_test_email();
                }
                Self::library_flow_from(address, true)
            }
            _ => self.clone(),
        }
    }

    /// Address registered by the success path, if the scenario has one
    pub fn registration_email(&self) -> Option<&str> {
        self.email.as_ref().map(|email| email.address.as_str())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Index of the first step with the given title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.title == title)
    }
}

/// `tester_<0..9999>@xan.id`
pub fn generate_test_email() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("tester_{suffix}@xan.id")
}

#[allow(clippy::too_many_arguments)]
fn step(
    id: u32,
    title: &str,
    description: &str,
    method: HttpMethod,
    path: &str,
    payload: Option<serde_json::Value>,
    expectation: Expectation,
    action: StepAction,
) -> Step {
    Step {
        id,
        title: title.to_string(),
        description: description.to_string(),
        method,
        path: path.to_string(),
        payload,
        expectation,
        action,
    }
}

fn library_steps(email: String) -> Vec<Step> {
    use Expectation::{Failure, Success};
    use HttpMethod::{Get, Post};

    vec![
        step(
            1,
            "Register (Fail) - Email Tak Valid",
            "Mencoba mendaftar dengan format email yang salah untuk mengetes validasi.",
            Post,
            "/auth/register",
            Some(json!({ "email": "email-salah", "password": "123", "name": "User" })),
            Failure,
            StepAction::send().tolerating_failure(),
        ),
        step(
            2,
            "Register (Success)",
            "Mendaftar dengan data valid untuk membuat akun baru.",
            Post,
            "/auth/register",
            Some(json!({ "email": email, "password": TEST_PASSWORD, "name": "Tester Professional" })),
            Success,
            StepAction::send().remembering_email(),
        ),
        step(
            3,
            "OTP (Fail) - Kode Salah",
            "Mencoba verifikasi dengan kode OTP asal-asalan.",
            Post,
            "/auth/otp",
            Some(json!({ "email": "", "otp": "999999" })),
            Failure,
            StepAction::send().with_session_email().tolerating_failure(),
        ),
        step(
            4,
            "OTP (Success)",
            "Verifikasi akun menggunakan kode shortcut 123456.",
            Post,
            "/auth/otp",
            Some(json!({ "email": "", "otp": SHORTCUT_OTP })),
            Success,
            StepAction::send().with_session_email(),
        ),
        step(
            5,
            "Login (Fail) - Password Salah",
            "Mencoba login dengan password yang tidak sesuai.",
            Post,
            "/auth/login",
            Some(json!({ "email": "", "password": "SalahPassword" })),
            Failure,
            StepAction::send().with_session_email().tolerating_failure(),
        ),
        step(
            6,
            "Login (Success)",
            "Mendapatkan token JWT dengan kredensial yang benar.",
            Post,
            "/auth/login",
            Some(json!({ "email": "", "password": TEST_PASSWORD })),
            Success,
            StepAction::send().with_session_email().capturing(Capture::Token),
        ),
        step(
            7,
            "Cek Profil Saya",
            "Memverifikasi identitas user menggunakan Bearer Token.",
            Get,
            "/auth/me",
            None,
            Success,
            StepAction::send().authenticated(),
        ),
        step(
            8,
            "List Koleksi Buku",
            "Mengambil data buku yang tersedia untuk dipinjam.",
            Get,
            "/books",
            None,
            Success,
            StepAction::send().capturing(Capture::FirstResourceId),
        ),
        step(
            9,
            "Pinjam Buku",
            "Melakukan transaksi peminjaman buku secara otomatis.",
            Post,
            "/transactions/borrow/{book_id}",
            None,
            Success,
            StepAction::send()
                .authenticated()
                .requiring_resource()
                .capturing(Capture::TransactionId),
        ),
        step(
            10,
            "Kembalikan Buku",
            "Proses pengembalian buku yang telah dipinjam.",
            Post,
            "/transactions/return/{book_id}",
            None,
            Success,
            StepAction::send().authenticated().requiring_resource(),
        ),
        step(
            11,
            "Riwayat Pinjaman",
            "Mengecek riwayat transaksi terakhir user.",
            Get,
            "/transactions/history",
            None,
            Success,
            StepAction::send().authenticated(),
        ),
    ]
}
