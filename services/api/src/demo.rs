use crate::infra::open_repository;
use arion_recruit::applications::{
    ApplicationWizard, Branch, FieldUpdate, HttpSubmissionGateway, InterestArea,
    RegistrationRepository, RegistrationService, Residence, SetMember, SubmissionGateway,
    Vertical, WizardError, WizardState, YearOfStudy,
};
use arion_recruit::config::{RegistrationConfig, StorageConfig};
use arion_recruit::error::AppError;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Submit to a running intake service (e.g. http://127.0.0.1:3000) instead of in-process.
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Team Arion application demo");

    match args.endpoint {
        Some(endpoint) => {
            let gateway = Arc::new(HttpSubmissionGateway::new(&endpoint)?);
            println!("- submitting to {}", gateway.endpoint());
            let mut wizard = ApplicationWizard::new(gateway);
            walk_through(&mut wizard).await;
        }
        None => {
            let repository = Arc::new(open_repository(&StorageConfig::InMemory)?);
            let service = Arc::new(RegistrationService::new(
                repository.clone(),
                RegistrationConfig::default(),
            ));
            println!("- submitting to the in-process registration service");
            let mut wizard = ApplicationWizard::new(service);
            walk_through(&mut wizard).await;
            println!("- {} application(s) stored", repository.count()?);
        }
    }

    Ok(())
}

async fn walk_through<G: SubmissionGateway>(wizard: &mut ApplicationWizard<G>) {
    if let Err(err) = fill_sample_applicant(wizard) {
        println!("  Wizard stopped: {err}");
        return;
    }

    println!("\nReview");
    for entry in wizard.review() {
        println!("  {:<15} {}", entry.label, entry.value);
    }

    match wizard.submit().await {
        Ok(WizardState::Submitted(reg_no)) => {
            println!("\nApplication submitted. Registration number: {reg_no}");
        }
        Ok(WizardState::SubmitFailed(reason)) => {
            println!("\nSubmission failed: {reason}");
        }
        Ok(other) => println!("\nWizard ended in unexpected state {other:?}"),
        Err(err) => println!("\nSubmission refused: {err}"),
    }
}

fn fill_sample_applicant<G: SubmissionGateway>(
    wizard: &mut ApplicationWizard<G>,
) -> Result<(), WizardError> {
    println!("\n[{}] {}", wizard.current_step().index() + 1, wizard.current_step().title());
    for update in [
        FieldUpdate::FullName("Meera Iyer".to_string()),
        FieldUpdate::Email("meera.iyer@example.com".to_string()),
        FieldUpdate::Usn("1NT24EC117".to_string()),
        FieldUpdate::Phone("+91 99001 23456".to_string()),
        FieldUpdate::Branch(Some(Branch::ElectronicsCommunication)),
        FieldUpdate::Year(Some(YearOfStudy::Second)),
    ] {
        wizard.update(update)?;
    }
    step_forward(wizard)?;

    wizard.update(FieldUpdate::Motivation(
        "I want to build the data acquisition system that tells us why a lap was fast."
            .to_string(),
    ))?;
    wizard.toggle(SetMember::Vertical(Vertical::Engineering))?;
    wizard.toggle(SetMember::Vertical(Vertical::SocialMedia))?;
    step_forward(wizard)?;

    wizard.toggle(SetMember::InterestArea(InterestArea::DataAcquisition))?;
    wizard.toggle(SetMember::InterestArea(InterestArea::ElectricalElectronics))?;
    wizard.update(FieldUpdate::InterestOther("Telemetry".to_string()))?;
    step_forward(wizard)?;

    wizard.update(FieldUpdate::Residence(Some(Residence::HostelOutOfCampus)))?;
    wizard.update(FieldUpdate::Experience(
        "Robotics club, line follower and CAN bus logger.".to_string(),
    ))?;
    step_forward(wizard)?;

    wizard.update(FieldUpdate::ConsentGdpr(true))?;
    wizard.update(FieldUpdate::ConsentTerms(true))?;
    Ok(())
}

fn step_forward<G: SubmissionGateway>(
    wizard: &mut ApplicationWizard<G>,
) -> Result<(), WizardError> {
    let step = wizard.advance()?;
    println!(
        "[{}] {} ({:.0}% through)",
        step.index() + 1,
        step.title(),
        wizard.progress() * 100.0
    );
    Ok(())
}
