use std::fs;

use insta::assert_snapshot;

use prontuario_core::OutputSettings;
use prontuario_model::{
    DemographicRecord, DocumentExtraction, FilteredEntities, PatientTables, Sex,
};
use prontuario_output::{TableFrame, table_frames, write_csv_outputs};

fn document(name: &str, sex: Sex, birth: &str) -> DocumentExtraction {
    DocumentExtraction {
        demographics: DemographicRecord::new(name, sex, birth).unwrap(),
        entities: FilteredEntities::default(),
        procedures: Vec::new(),
        vaccines: Vec::new(),
    }
}

fn frames(tables: &PatientTables) -> Vec<TableFrame> {
    table_frames(tables).unwrap()
}

fn sample_tables() -> PatientTables {
    let mut ana = document("Ana Silva", Sex::Female, "1980-05-02");
    ana.entities.diseases = vec!["Hypertension".to_string()];
    ana.entities.medications = vec!["Hydrochlorothiazide".to_string()];
    ana.procedures = vec!["Blood pressure check".to_string()];
    ana.vaccines = vec!["Influenza, seasonal".to_string()];

    let bruno = document("Bruno Costa", Sex::Male, "1975-11-30");

    let mut tables = PatientTables::new();
    tables.append(&ana);
    tables.append(&bruno);
    tables
}

#[test]
fn writes_four_tables_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let outputs =
        write_csv_outputs(dir.path(), &mut frames(&sample_tables()), &OutputSettings::default()).unwrap();

    let names: Vec<String> = outputs
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "pacientes.csv",
            "condicoes.csv",
            "tratamentos.csv",
            "procedimentos_vacinas.csv"
        ]
    );

    assert_snapshot!(fs::read_to_string(&outputs[0]).unwrap(), @r"
    Name,Sex,DataDeNascimento
    Ana Silva,F,1980-05-02
    Bruno Costa,M,1975-11-30
    ");
    assert_snapshot!(fs::read_to_string(&outputs[1]).unwrap(), @r"
    NomeDoPaciente,CondicaoMedica
    Ana Silva,Hypertension
    ");
    assert_snapshot!(fs::read_to_string(&outputs[3]).unwrap(), @r#"
    NomeDoPaciente,ProcedimentoVacina
    Ana Silva,Blood pressure check
    Ana Silva,"Influenza, seasonal"
    "#);
}

#[test]
fn empty_batch_writes_header_only_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("output");
    let outputs = write_csv_outputs(&out, &mut frames(&PatientTables::new()), &OutputSettings::default()).unwrap();

    assert_eq!(outputs.len(), 4);
    assert_eq!(
        fs::read_to_string(out.join("tratamentos.csv")).unwrap(),
        "NomeDoPaciente,Medicamento\n"
    );
}

#[test]
fn custom_file_names_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    let settings = OutputSettings {
        patients: "patients.csv".to_string(),
        ..OutputSettings::default()
    };
    write_csv_outputs(dir.path(), &mut frames(&sample_tables()), &settings).unwrap();
    assert!(dir.path().join("patients.csv").is_file());
    assert!(!dir.path().join("pacientes.csv").exists());
}

#[test]
fn existing_files_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("condicoes.csv"), "stale\nrows\nfrom\nbefore\n").unwrap();
    write_csv_outputs(dir.path(), &mut frames(&PatientTables::new()), &OutputSettings::default()).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("condicoes.csv")).unwrap(),
        "NomeDoPaciente,CondicaoMedica\n"
    );
}

#[test]
fn failed_run_keeps_previous_outputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pacientes.csv"), "Name,Sex,DataDeNascimento\nold,F,1970-01-01\n")
        .unwrap();
    fs::create_dir(dir.path().join("tratamentos.csv")).unwrap();

    let err = write_csv_outputs(dir.path(), &mut frames(&sample_tables()), &OutputSettings::default())
        .unwrap_err();

    assert!(err.to_string().contains("tratamentos.csv"));
    assert_eq!(
        fs::read_to_string(dir.path().join("pacientes.csv")).unwrap(),
        "Name,Sex,DataDeNascimento\nold,F,1970-01-01\n"
    );
    assert!(!dir.path().join("condicoes.csv").exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 2, "unexpected files: {leftovers:?}");
}
