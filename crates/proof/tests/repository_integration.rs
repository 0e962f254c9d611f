use crev_core::{Level, Rating, TrustLevel};
use crev_identity::UnsealedId;
use crev_proof::{
    load_document, load_repo_proofs, sanitize_url_for_fs, serialize, write_proof, PackageInfo,
    Proof, ProofError, ProofKind, ReviewInfo, PROOF_FILE_SUFFIX,
};
use std::fs;

const URL: &str = "https://github.com/alice/crev-proofs";

fn review(id: &UnsealedId, name: &str) -> Proof {
    Proof::package_review(
        id.public_id(),
        PackageInfo::new("https://registry.npmjs.com", name, "2.0.0", "digest"),
        ReviewInfo {
            thoroughness: Level::Low,
            understanding: Level::Medium,
            rating: Rating::Neutral,
        },
    )
}

#[test]
fn integration_rotated_key_shares_repository() {
    let dir = tempfile::tempdir().unwrap();
    let old_key = UnsealedId::generate(URL);
    let new_key = UnsealedId::generate(URL);

    write_proof(
        dir.path(),
        &old_key,
        Proof::trust(old_key.public_id(), vec![new_key.public_id()], TrustLevel::High),
    )
    .unwrap();
    write_proof(
        dir.path(),
        &new_key,
        Proof::trust(new_key.public_id(), vec![old_key.public_id()], TrustLevel::High),
    )
    .unwrap();

    let repo = dir.path().join(sanitize_url_for_fs(URL));
    assert_eq!(fs::read_dir(&repo).unwrap().count(), 2);

    let trust = load_repo_proofs(&repo, ProofKind::Trust).unwrap();
    let mut issuers: Vec<_> = trust.iter().map(|p| p.issuer().id.clone()).collect();
    let mut expected = vec![old_key.id(), new_key.id()];
    expected.sort();
    assert_eq!(issuers, expected);
    issuers.dedup();
    assert_eq!(issuers.len(), 2);

    assert!(load_repo_proofs(&repo, ProofKind::PackageReview)
        .unwrap()
        .is_empty());
}

#[test]
fn integration_document_with_several_envelopes() {
    let dir = tempfile::tempdir().unwrap();
    let id = UnsealedId::generate(URL);
    let document: String = ["chalk", "debug", "ms"]
        .iter()
        .map(|name| serialize(&review(&id, name), &id).unwrap())
        .collect();

    let path = dir.path().join(format!("bundle{}", PROOF_FILE_SUFFIX));
    fs::write(&path, &document).unwrap();

    let proofs = load_document(&path).unwrap();
    let names: Vec<_> = proofs.iter().map(Proof::target).collect();
    assert_eq!(names, vec!["chalk", "debug", "ms"]);
}

#[test]
fn integration_proof_in_wrong_folder_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let id = UnsealedId::generate(URL);
    let misplaced = dir.path().join(id.id()).join("reviews");
    fs::create_dir_all(&misplaced).unwrap();

    let trust = Proof::trust(id.public_id(), vec![id.public_id()], TrustLevel::Low);
    fs::write(
        misplaced.join(format!("misplaced{}", PROOF_FILE_SUFFIX)),
        serialize(&trust, &id).unwrap(),
    )
    .unwrap();

    assert!(matches!(
        load_repo_proofs(dir.path(), ProofKind::PackageReview),
        Err(ProofError::UnexpectedKind {
            expected: ProofKind::PackageReview,
            found: ProofKind::Trust,
        })
    ));
}
