use arion_recruit::applications::{
    Branch, InterestArea, Residence, Vertical, WizardStep, YearOfStudy,
};

pub(crate) fn print_catalogs() {
    print!("{}", render_catalogs());
}

fn render_catalogs() -> String {
    let mut out = String::new();
    section(&mut out, "Steps", WizardStep::ALL.iter().map(|step| step.title()));
    section(&mut out, "Branches", Branch::ALL.iter().map(|option| option.label()));
    section(&mut out, "Years", YearOfStudy::ALL.iter().map(|option| option.label()));
    section(&mut out, "Verticals", Vertical::ALL.iter().map(|option| option.label()));
    section(
        &mut out,
        "Interest areas",
        InterestArea::ALL.iter().map(|option| option.label()),
    );
    section(&mut out, "Residence", Residence::ALL.iter().map(|option| option.label()));
    out
}

fn section<'a>(out: &mut String, title: &str, labels: impl Iterator<Item = &'a str>) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    for label in labels {
        out.push_str("  - ");
        out.push_str(label);
        out.push('\n');
    }
}
