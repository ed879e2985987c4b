use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use vigil::{ActivityEvent, Credentials, Navigator, Notifier, Warden, settings};

// ---------------------------------------------------------------------------
// Terminal capabilities
// ---------------------------------------------------------------------------

/// Prints notifications where a console would show a toast.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) {
        eprintln!("\n  *** {title} ***\n  {body}\n");
    }
}

/// "Navigates" by ending the demo: there is no login page to return to.
struct ExitNavigator;

impl Navigator for ExitNavigator {
    fn navigate(&self, path: &str) {
        eprintln!("navigating to {path}, goodbye");
        std::process::exit(0);
    }
}

/// Fabricates a JWT-shaped token; the demo has no backend to mint one.
fn fake_token() -> String {
    let mut rng = rand::rng();
    let hex = |bytes: &[u8]| {
        bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
    };
    let header: [u8; 4] = rng.random();
    let payload: [u8; 12] = rng.random();
    let signature: [u8; 8] = rng.random();
    format!("{}.{}.{}", hex(&header), hex(&payload), hex(&signature))
}

// ---------------------------------------------------------------------------
// Demo bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let warden = Warden::builder().build(TerminalNotifier, ExitNavigator);

    // One-minute timeout so the demo expires while you watch.
    settings::set_session_timeout_minutes(warden.store(), 1);
    warden.login(Credentials::bearer(fake_token()))?;

    eprintln!("signed in with a 1-minute idle timeout");
    eprintln!("type anything to register activity; stay idle to be signed out");
    eprintln!("lines like \"keypress\" or \"scroll\" count as that specific event");

    let (events, receiver) = mpsc::unbounded_channel();
    warden.monitor().attach_events(receiver);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // A line naming a DOM event maps to that kind; anything else
        // counts as a keypress.
        let event =
            serde_json::from_value(serde_json::Value::String(line.trim().to_lowercase()))
                .unwrap_or(ActivityEvent::KeyPress);
        events.send(event)?;
        eprintln!(
            "activity recorded, idle for {:?}",
            warden.monitor().idle_for()
        );
    }

    // Stdin closed; stay alive until the idle expiry ends the demo.
    std::future::pending::<()>().await;
    Ok(())
}
