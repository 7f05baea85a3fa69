//! Fixed option lists offered by the application form.
//!
//! Every option travels over the wire as the exact label the applicant sees, and the
//! declaration order is the display order, which `Ord` follows so sets iterate the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when a label does not name any option of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{label}' is not a known {catalog}")]
pub struct UnknownOption {
    pub catalog: &'static str,
    pub label: String,
}

macro_rules! catalog {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == raw)
                    .ok_or_else(|| UnknownOption {
                        catalog: $kind,
                        label: raw.to_string(),
                    })
            }
        }
    };
}

catalog! {
    /// Degree programs offered on campus.
    Branch as "branch" {
        AiDataScience => "Artificial Intelligence & Data Science",
        AiMachineLearning => "Artificial Intelligence & Machine Learning",
        Aeronautical => "Aeronautical Engineering",
        Civil => "Civil Engineering",
        CsBusinessSystems => "Computer Science & Business Systems",
        ComputerScience => "Computer Science & Engineering",
        ElectricalElectronics => "Electrical & Electronics Engineering",
        ElectronicsCommunication => "Electronics & Communication Engineering",
        ElectronicsVlsi => "Electronics Engineering (VLSI Design & Technology)",
        InformationScience => "Information Science & Engineering",
        Mechanical => "Mechanical Engineering",
        RoboticsAi => "Robotics and Artificial Intelligence",
    }
}

catalog! {
    YearOfStudy as "year of study" {
        First => "1st Year",
        Second => "2nd Year",
        Third => "3rd Year",
        Fourth => "4th Year",
    }
}

catalog! {
    /// Team divisions an applicant can join.
    Vertical as "vertical" {
        Engineering => "Engineering",
        BusinessManagement => "Business & Management",
        SocialMedia => "Social Media",
    }
}

catalog! {
    /// Work areas an applicant can express interest in.
    InterestArea as "interest area" {
        Aerodynamics => "Aerodynamics",
        ContentCreation => "Content Creation",
        DataAcquisition => "Data Acquisition & Analysis",
        DesignEngineering => "Design Engineering (CAD/CAE)",
        Documentation => "Documentation & Book Keeping",
        ElectricalElectronics => "Electrical & Electronics Engineering",
        FinanceAccounting => "Finance & Accounting",
        InventoryManagement => "Inventory Management",
        Manufacturing => "Manufacturing (CAM/DFM/Mechanical)",
        MaterialsComposites => "Material & Composites",
        MechanicalEngineering => "Mechanical Engineering",
        PhotoVideoEditing => "Photo & Video Editing (GFX & VFX)",
        PhotographyVideography => "Photography & Videography",
        ProcurementLogistics => "Procurement & Logistics",
        PureSciences => "Pure Sciences (Physics, Chemistry, Maths)",
        SoftwareEngineering => "Software Engineering",
        SponsorshipPr => "Sponsorship & Public Relations",
        StructuralEngineering => "Structural Engineering",
        SimulationAnalysis => "Simulation & Analysis",
        ThermalEngineering => "Thermal Engineering",
        TestingValidation => "Testing & Validation",
        UiPresentations => "UI & Presentations",
    }
}

catalog! {
    Residence as "residence type" {
        DayScholar => "Day scholar",
        HostelInCampus => "Hostelite(in campus)",
        HostelOutOfCampus => "Hostelite(out of campus)",
        PgResident => "PG resident",
    }
}
