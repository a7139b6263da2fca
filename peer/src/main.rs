use clap::Parser;
use log::{error, info};
use macroquad::miniquad::conf::Conf;
use macroquad::window::next_frame;
use peer::error::PeerError;
use peer::game::{GameLoop, Session, TickStatus};
use peer::input::{InputEvent, InputManager};
use peer::network::establish;
use peer::rendering::{Presenter, Renderer, BOARD_PIXELS, STATUS_BAR_PIXELS};
use shared::{Role, DEFAULT_HOST, DEFAULT_PORT, TICK_RATE_HZ};
use std::net::{SocketAddr, ToSocketAddrs};
use std::process;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-player tic-tac-toe over TCP", long_about = None)]
struct Args {
    /// Address to listen on when hosting, or the host's address when joining
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Host the game and play X instead of joining as O
    #[arg(long)]
    server: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Tic-Tac-Toe".to_owned(),
        window_width: BOARD_PIXELS as i32,
        window_height: (BOARD_PIXELS + STATUS_BAR_PIXELS) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn resolve(host: &str) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let addr = (host, DEFAULT_PORT)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| format!("{} did not resolve to any address", host))?;
    Ok(addr)
}

/// Reports a fatal error and terminates the process.
fn exit_with(err: &PeerError) -> ! {
    error!("{}", err);
    eprintln!("Network error: {}", err);

    if let PeerError::Transport(e) = err {
        if e.is_connection_error() {
            eprintln!("Check that:");
            eprintln!("1. The host is running if you are joining a game");
            eprintln!("2. The address is correct (use the host's real IP, not localhost, for remote games)");
            eprintln!("3. Port {} is not blocked by a firewall", DEFAULT_PORT);
        }
    }
    process::exit(1);
}

async fn run(runtime: Runtime, role: Role, addr: SocketAddr) {
    let mut input = InputManager::new();
    let mut renderer = Renderer::new();
    let session = Session::new(role);

    let pending = runtime.spawn(establish(role, addr));
    while !pending.is_finished() {
        if input.poll().contains(&InputEvent::QuitRequested) {
            info!("Quit before a peer connected");
            return;
        }
        renderer.render(&session.view());
        next_frame().await;
    }

    let connection = match runtime.block_on(pending) {
        Ok(Ok(connection)) => connection,
        Ok(Err(e)) => exit_with(&PeerError::from(e)),
        Err(e) => {
            error!("Connection task failed: {}", e);
            process::exit(1);
        }
    };

    info!("Playing against {}", connection.peer_addr());
    let mut game = GameLoop::new(session, connection);
    let mut ticker = {
        let _guard = runtime.enter();
        interval(Duration::from_secs_f64(1.0 / TICK_RATE_HZ as f64))
    };
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let events = input.poll();
        let result = runtime.block_on(async {
            ticker.tick().await;
            game.tick(&events, &mut renderer).await
        });

        match result {
            Ok(TickStatus::Continue) => {}
            Ok(TickStatus::Quit) => break,
            Err(e) => {
                runtime.block_on(game.shutdown());
                exit_with(&e);
            }
        }

        next_frame().await;
    }

    runtime.block_on(game.shutdown());
    info!("Goodbye");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let role = Role::from_server_flag(args.server);
    let addr = resolve(&args.host)?;
    let runtime = Runtime::new()?;

    info!("Starting as {} ({}) on {}", role, role.mark(), addr);
    info!("Click a cell to move, Escape or close the window to quit");

    macroquad::Window::from_config(window_conf(), run(runtime, role, addr));

    Ok(())
}
