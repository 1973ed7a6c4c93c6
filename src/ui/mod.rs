use crate::dispatcher::Dispatcher;
use crate::shared::ElevatorSnapshot;
use std::io::{self, Write};

// Console menu for the simulator. Reads user input, formats the status
// report and forwards calls to the dispatcher; no domain logic lives here.

pub fn run(dispatcher: &mut Dispatcher) {
    loop {
        println!();
        println!("Elevator Dispatch");
        println!("1. View elevator status");
        println!("2. Call elevator");
        println!("3. Exit");
        print!("Select an option: ");

        let input = match read_line() {
            Some(line) => line,
            None => return,
        };

        match input.as_str() {
            "1" => print_status(&dispatcher.status_report()),
            "2" => call_elevator(dispatcher),
            "3" => return,
            _ => println!("Invalid option. Please try again."),
        }
    }
}

fn call_elevator(dispatcher: &mut Dispatcher) {
    print!("Enter floor number (1-{}): ", dispatcher.n_floors());
    let floor = match prompt_number() {
        Some(floor) => floor,
        None => {
            println!("Invalid floor number entered.");
            return;
        }
    };

    print!("Enter number of passengers: ");
    let passengers = match prompt_number() {
        Some(passengers) => passengers,
        None => {
            println!("Invalid number of passengers.");
            return;
        }
    };

    match dispatcher.submit(floor, passengers) {
        Ok(id) => println!("Elevator {} is being dispatched to floor {}.", id, floor),
        Err(e) => println!("** {}", e),
    }
}

fn print_status(report: &[ElevatorSnapshot]) {
    println!("Elevator Status");
    println!("ID | Floor | Direction | Status     | Passengers");
    println!("-----------------------------------------------");
    for snapshot in report {
        println!(
            "{:2} | {:5} | {:<9} | {:<10} | {:10}",
            snapshot.id, snapshot.floor, snapshot.direction, snapshot.status, snapshot.occupancy
        );
    }
}

fn prompt_number() -> Option<u8> {
    read_line()?.parse::<u8>().ok()
}

// None on EOF, so a closed stdin exits the menu cleanly.
fn read_line() -> Option<String> {
    io::stdout().flush().ok()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim().to_string())
}
