/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::info;
use std::path::Path;
use std::sync::Arc;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use elevator_sim::config;
use elevator_sim::simulation::{display, generator, input};
use elevator_sim::unwrap_or_exit;
use elevator_sim::{Building, PassengerElevator, PickupRequest};

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Command::new("elevator_sim")
        .about("Simulates dispatch and movement of passenger elevators")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print elevator snapshots as JSON lines"),
        )
        .get_matches();

    // Load the configuration
    let config_path = args.value_of("config").unwrap_or("config.toml");
    let config = unwrap_or_exit!(
        config::load_config(Path::new(config_path)),
        "Failed to load configuration"
    );

    // Elevators start on the ground floor, or the lowest floor if there is none
    let floors = config.building.floors.clone();
    let start_floor = if floors.iter().any(|f| f.number == 0) {
        0
    } else {
        floors.iter().map(|f| f.number).min().unwrap_or(0)
    };
    let elevators = (0..config.building.elevators)
        .map(|_| PassengerElevator::new(start_floor))
        .collect();

    // Initialize channels
    let (pickup_complete_tx, pickup_complete_rx) = cbc::unbounded::<PickupRequest>();
    let (quit_tx, quit_rx) = cbc::unbounded::<()>();

    // Create the building
    let building = unwrap_or_exit!(Building::new(elevators, floors), "Invalid building");
    let building = Arc::new(
        building
            .with_timing(config.elevator.clone())
            .with_dispatcher_config(config.dispatcher.clone())
            .with_pickup_notifier(pickup_complete_tx),
    );

    // Start the core
    unwrap_or_exit!(building.start_elevators(), "Failed to start elevators");
    unwrap_or_exit!(building.start_dispatcher(), "Failed to start dispatcher");

    // Start the collaborators
    let display_building = Arc::clone(&building);
    let status_interval = Duration::from_millis(config.simulation.status_interval);
    let json = args.is_present("json");
    unwrap_or_exit!(
        Builder::new()
            .name("status_display".into())
            .spawn(move || display::run(display_building, status_interval, json)),
        "Failed to start status display"
    );

    if config.simulation.random_requests {
        let generator_building = Arc::clone(&building);
        let request_interval = Duration::from_millis(config.simulation.request_interval);
        unwrap_or_exit!(
            Builder::new()
                .name("request_generator".into())
                .spawn(move || generator::run(generator_building, request_interval)),
            "Failed to start request generator"
        );
    }

    // Keeping `quit_tx` alive here means end of input does not end the simulation
    let input_building = Arc::clone(&building);
    let input_quit_tx = quit_tx.clone();
    unwrap_or_exit!(
        Builder::new()
            .name("input".into())
            .spawn(move || input::run(input_building, input_quit_tx)),
        "Failed to start input reader"
    );

    // Main loop
    loop {
        cbc::select! {
            recv(pickup_complete_rx) -> request => {
                match request {
                    Ok(request) => info!(
                        "Request {} picked up at floor {}, heading to {}",
                        request.id(),
                        request.origin(),
                        request.destination()
                    ),
                    Err(_) => break,
                }
            }
            recv(quit_rx) -> _ => break,
        }
    }

    building.shutdown();
    drop(quit_tx);
}
