use std::{error::Error, io};

use clap::{Parser, Subcommand};
use email_address::EmailAddress;
use rusqlite::Connection;

use dinar_wallet::{
    PasswordHash, ValidatedPassword, initialize_db,
    models::{NewPlan, NewUser, Username},
    money::Money,
    stores::{PlanStore, UserStore},
};

/// Administration tasks for the dinar wallet database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, global = true, default_value = "dinar_wallet.db")]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a staff user. The password is read from the terminal.
    CreateSuperuser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },

    /// Add an investment plan.
    AddPlan {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// The yearly return in percent, e.g. 5.5.
        #[arg(long)]
        annual_rate: f64,

        /// The smallest amount in dinar that may be invested, e.g. 250.00.
        #[arg(long)]
        min_amount: String,

        #[arg(long)]
        duration_months: u32,

        /// Add the plan without opening it for subscriptions.
        #[arg(long)]
        inactive: bool,
    },

    /// Print every investment plan.
    ListPlans,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    match args.command {
        Command::CreateSuperuser { username, email } => {
            create_superuser(&connection, &username, &email)
        }
        Command::AddPlan {
            name,
            description,
            annual_rate,
            min_amount,
            duration_months,
            inactive,
        } => {
            let min_amount = Money::parse_form_input(&min_amount, Money::ZERO)?;
            let plan = NewPlan::new(
                &name,
                &description,
                annual_rate,
                min_amount,
                duration_months,
                !inactive,
            )?;
            let plan = connection.create_plan(plan)?;
            println!("Added plan {} with ID {}", plan.name, plan.id);
            Ok(())
        }
        Command::ListPlans => list_plans(&connection),
    }
}

fn create_superuser(
    connection: &Connection,
    raw_username: &str,
    raw_email: &str,
) -> Result<(), Box<dyn Error>> {
    let username = Username::new(raw_username)?;
    let email: EmailAddress = raw_email.trim().parse()?;

    let Some(password) = prompt_new_password(&[raw_username.trim(), raw_email.trim()]) else {
        return Ok(());
    };
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = connection.create_user(NewUser {
        username,
        email,
        password_hash,
        is_staff: true,
    })?;

    println!("Created staff user {} with ID {}", user.username, user.id);

    Ok(())
}

/// Ask for a password twice until it is strong enough and both entries match.
///
/// Returns `None` if the input ends or cannot be read.
fn prompt_new_password(user_inputs: &[&str]) -> Option<ValidatedPassword> {
    loop {
        println!();

        let first_password = read_password("Enter a password: ")?;

        let password = match ValidatedPassword::new(&first_password, user_inputs) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = read_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Some(password);
    }
}

fn read_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn list_plans(connection: &Connection) -> Result<(), Box<dyn Error>> {
    let plans = connection.get_all_plans()?;

    if plans.is_empty() {
        println!("No plans.");
        return Ok(());
    }

    for plan in plans {
        println!(
            "{:>4}  {:<30} {:>6}% {:>14} JOD {:>3} months{}",
            plan.id,
            plan.name,
            plan.annual_rate,
            plan.min_amount,
            plan.duration_months,
            if plan.is_active { "" } else { "  (inactive)" }
        );
    }

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
