use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use super::chat::ChatRequest;
use super::portal::PortalRequest;
use super::{Channels, ServiceError};
use crate::models::{
    users::{ProfileUpdate, SignupData},
    views::{DashboardSection, Modal},
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModalTarget {
    Login,
    Signup,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ConsoleCommand {
    /// Request a login OTP
    Login { mobile: String },
    /// Request a signup OTP. Quote a name that has spaces
    Signup {
        name: String,
        mobile: String,
        email: String,
    },
    /// Confirm the OTP
    Otp { code: String },
    /// Send the OTP again
    Resend,
    Logout,
    /// Enter the number to recharge
    Recharge { mobile: String },
    /// Browse the plan catalog
    Plans { category: Option<String> },
    /// Pick a plan by amount
    Select { amount: String },
    /// Pay for the selected plan
    Pay { method: String },
    /// Switch dashboard section: overview, history, saved-plans, profile
    Section { section: DashboardSection },
    /// Edit name and email
    Profile { name: String, email: String },
    Save { amount: String },
    Unsave { amount: String },
    Open { target: ModalTarget },
    Close,
    /// Talk to the support bot
    Chat {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },
    Status,
    Quit,
}

async fn request<T>(
    channels: &Channels,
    build: impl FnOnce(oneshot::Sender<Result<T, ServiceError>>) -> PortalRequest,
) -> Result<T, ServiceError> {
    let (response_tx, response_rx) = oneshot::channel();

    channels
        .portal
        .send(build(response_tx))
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication("Portal".to_string(), e.to_string()))?
}

/// Runs one command. Returns false once the user asked to quit.
async fn execute(command: ConsoleCommand, channels: &Channels) -> Result<bool, ServiceError> {
    match command {
        ConsoleCommand::Login { mobile } => {
            request(channels, |response| PortalRequest::RequestLogin { mobile, response }).await?
        }
        ConsoleCommand::Signup {
            name,
            mobile,
            email,
        } => {
            let signup = SignupData {
                name,
                mobile,
                email,
            };
            request(channels, |response| PortalRequest::RequestSignup { signup, response })
                .await?
        }
        ConsoleCommand::Otp { code } => {
            request(channels, |response| PortalRequest::ConfirmOtp { code, response }).await?;
        }
        ConsoleCommand::Resend => {
            request(channels, |response| PortalRequest::ResendOtp { response }).await?
        }
        ConsoleCommand::Logout => {
            request(channels, |response| PortalRequest::Logout { response }).await?
        }
        ConsoleCommand::Recharge { mobile } => {
            request(channels, |response| PortalRequest::SubmitRechargeNumber {
                mobile,
                response,
            })
            .await?;
        }
        ConsoleCommand::Plans { category } => {
            request(channels, |response| PortalRequest::BrowsePlans { category, response })
                .await?;
        }
        ConsoleCommand::Select { amount } => {
            request(channels, |response| PortalRequest::SelectPlan { amount, response }).await?
        }
        ConsoleCommand::Pay { method } => {
            request(channels, |response| PortalRequest::ConfirmPayment { method, response })
                .await?
        }
        ConsoleCommand::Section { section } => {
            request(channels, |response| PortalRequest::ShowSection { section, response })
                .await?
        }
        ConsoleCommand::Profile { name, email } => {
            let update = ProfileUpdate { name, email };
            request(channels, |response| PortalRequest::UpdateProfile { update, response })
                .await?;
        }
        ConsoleCommand::Save { amount } => {
            request(channels, |response| PortalRequest::SavePlan {
                plan: amount,
                response,
            })
            .await?;
        }
        ConsoleCommand::Unsave { amount } => {
            request(channels, |response| PortalRequest::RemovePlan {
                plan: amount,
                response,
            })
            .await?;
        }
        ConsoleCommand::Open { target } => {
            let modal = match target {
                ModalTarget::Login => Modal::Login,
                ModalTarget::Signup => Modal::Signup,
            };
            request(channels, |response| PortalRequest::OpenModal { modal, response }).await?
        }
        ConsoleCommand::Close => {
            request(channels, |response| PortalRequest::CloseModal { response }).await?
        }
        ConsoleCommand::Chat { message } => {
            channels
                .chat
                .send(ChatRequest::Send {
                    message: message.join(" "),
                })
                .await
                .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;
        }
        ConsoleCommand::Status => {
            let status = request(channels, |response| PortalRequest::GetStatus { response }).await?;
            println!("{:#?}", status);
        }
        ConsoleCommand::Quit => return Ok(false),
    }

    Ok(true)
}

/// Splits like a shell so quoted names keep their spaces. A line with unbalanced quotes, such as
/// a chat message with an apostrophe, falls back to plain whitespace splitting.
fn parse_line(line: &str) -> Result<ConsoleCommand, clap::Error> {
    let words = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(str::to_string).collect());

    ConsoleLine::try_parse_from(words).map(|parsed| parsed.command)
}

pub async fn run_console(channels: Channels) -> Result<(), anyhow::Error> {
    let mut lines = BufReader::new(io::stdin()).lines();
    println!("Type `help` for the list of commands.");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.render());
                continue;
            }
        };
        log::debug!("Console command: {:?}", command);

        match execute(command, &channels).await {
            Ok(true) => (),
            Ok(false) => break,
            Err(ServiceError::Communication(component, e)) => {
                log::error!("Lost connection to {}: {}", component, e);
                return Err(anyhow::anyhow!("{} is no longer running", component));
            }
            Err(e) => log::debug!("Command failed: {}", e),
        }
    }

    log::info!("Console closed.");
    Ok(())
}
