use crate::domain::mission::MissionDataset;
use crate::infrastructure::csv::CsvParser;

/// Ten missions from 1966 to 1972, three of them operated by the United States.
pub const SAMPLE_CSV: &str = r#"Mission,Spacecraft,Launch Date,Carrier Rocket,Operator,Mission Type,Outcome,Additional information
Luna 9,Ye-6M,31 January 1966,Molniya-M,Soviet Union,Lander,Successful,"First soft landing, first images from the surface"
Surveyor 1,Surveyor,"May 30, 1966",Atlas-Centaur,United States (NASA),Lander,Successful,
Luna 15,Ye-8-5,13-Jul-69,Proton-K,Soviet Union,Lander,Spacecraft failure,Crashed in Mare Crisium
Apollo 11,CSM/LM,1969-07-16,Saturn V,United States (NASA),Crewed landing,Successful,First crewed landing
Apollo 13,CSM/LM,4/11/70,Saturn V,United States (NASA),Crewed flyby,Partial failure,Landing aborted
Luna 16,Ye-8-5,12 September 1970,Proton-K,Soviet Union,Sample return,Successful,
Luna 17,Ye-8,1970-11-10,Proton-K,Soviet Union,Rover,Successful,Lunokhod 1
Luna 18,Ye-8-5,1971-09-02,Proton-K,Soviet Union,Lander,Spacecraft failure,
Soyuz 7K-L3,LOK,1972-11-23,N1,Soviet Union,Crewed orbiter,Launch failure,
Hiten-B,MUSES,not recorded,Mu-3,Japan / European Union,Orbiter,Launch failure,
"#;

pub fn sample_dataset() -> MissionDataset {
    let table = CsvParser::new().parse_content(SAMPLE_CSV).unwrap();
    MissionDataset::from_rows(table.headers, table.rows).unwrap()
}
