//! Orchestrates components A-J over a whole metagenome: builds subcontigs, featurizes and
//! embeds them, clusters de-novo and (if an anchor table was supplied) anchor-tuned, recruits
//! candidates per anchor, and reconciles everything into a final label table.
//!
//! Stage boundaries are synchronization points: every stage's output is sorted into canonical
//! (lexicographic) order before the next stage reads it, so the pipeline's result depends only
//! on its inputs and `random_seed`, never on worker scheduling.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};

use crate::anchor::{self, Anchor};
use crate::contig::{build_subcontigs, Contig};
use crate::coverage::{join_coverage, CoverageTable};
use crate::denoise::{self, ContigDecision, SubcontigClusterRow};
use crate::denovo::cluster_embedding;
use crate::diagnostics::{Diagnostics, RecruiterKind};
use crate::embedding::embed;
use crate::ensemble::{self, EnsembleRow};
use crate::errors::BinnerError;
use crate::params::Params;
use crate::reconcile::{self, FinalLabel};
use crate::recruiters::{
    aggregate_recruiter, gmm_recruit, isolation_forest_recruit, kmeans_denoise_filter,
    ocsvm_recruit, total_weight,
};
use crate::tnf::compute_tnf_table;

pub struct PipelineOutput {
    pub denovo_rows: Vec<SubcontigClusterRow>,
    pub denovo_decisions: Vec<ContigDecision>,
    pub anchored_clusters: HashMap<String, BTreeSet<String>>,
    pub ensemble_rows: Vec<EnsembleRow>,
    pub final_labels: Vec<FinalLabel>,
    pub diagnostics: Diagnostics,
}

/// Runs the full pipeline. `anchors` is the grouped `(anchor_id -> trusted contig ids)` table
/// read from the anchor file; pass an empty map to run only the de-novo stages (4.E/4.F), per
/// the "anchors absent" failure semantics of 4.J.
pub fn run(contigs: &[Contig], coverage: &CoverageTable, anchors: &HashMap<String, BTreeSet<String>>,
           params: &Params) -> Result<PipelineOutput, BinnerError> {
    params.validate()?;
    let mut diagnostics = Diagnostics::new();

    info!("tiling {} contigs into subcontigs", contigs.len());
    let subcontigs: Vec<_> = contigs.iter()
        .flat_map(|c| build_subcontigs(c, params.window_size, params.overlap))
        .collect();
    debug!("{} subcontigs produced", subcontigs.len());

    let tnf_table = compute_tnf_table(&subcontigs);
    let coverage_rows = join_coverage(&tnf_table.subcontig_ids, coverage);
    let feature_dim = tnf_table.rows.first().map(|r| r.len()).unwrap_or(0) + coverage.n_samples();
    let features: Vec<Vec<f64>> = tnf_table.rows.iter().zip(coverage_rows.iter())
        .map(|(tnf, cov)| tnf.iter().chain(cov.iter()).copied().collect())
        .collect();

    let subcontig_to_contig: HashMap<String, String> = subcontigs.iter()
        .map(|s| (s.id.clone(), s.contig_id.clone()))
        .collect();

    info!("embedding {} subcontigs into {} dimensions", features.len(), params.embedding_dim);
    let embedding = embed(&tnf_table.subcontig_ids, &features, feature_dim, params.embedding_dim,
        params.embedding_metric, params.random_seed);

    let denovo_result = cluster_embedding(&embedding.rows, params.embedding_dim,
        params.denovo_min_cluster_size, params.denovo_min_samples);
    let denovo_rows: Vec<SubcontigClusterRow> = build_cluster_rows(&embedding.subcontig_ids,
        &subcontig_to_contig, &denovo_result.labels, &denovo_result.probabilities, &denovo_result.outlier_scores);
    let denovo_decisions = denoise::denoise(&denovo_rows, params);

    if anchors.is_empty() {
        info!("no anchors supplied; skipping 4.G-4.J");
        return Ok(PipelineOutput {
            denovo_rows,
            denovo_decisions,
            anchored_clusters: HashMap::new(),
            ensemble_rows: vec![],
            final_labels: vec![],
            diagnostics,
        });
    }

    let anchor_pairs: Vec<Anchor> = anchors.iter()
        .flat_map(|(anchor_id, contig_ids)| contig_ids.iter()
            .map(move |c| Anchor { anchor_id: anchor_id.clone(), contig_id: c.clone() }))
        .collect();

    let anchor_result = cluster_embedding(&embedding.rows, params.embedding_dim,
        params.anchor_min_cluster_size, params.anchor_min_samples);
    let anchor_rows: Vec<SubcontigClusterRow> = build_cluster_rows(&embedding.subcontig_ids,
        &subcontig_to_contig, &anchor_result.labels, &anchor_result.probabilities, &anchor_result.outlier_scores);
    let anchor_decisions = denoise::denoise(&anchor_rows, params);
    let contig_labels: HashMap<String, i64> = anchor_decisions.iter()
        .map(|d| (d.contig_id.clone(), d.best_label))
        .collect();

    let anchored_clusters = anchor::anchored_clusters(&anchor_pairs, &contig_labels);

    let feature_by_subcontig: HashMap<&str, &Vec<f64>> = tnf_table.subcontig_ids.iter()
        .zip(features.iter())
        .map(|(id, f)| (id.as_str(), f))
        .collect();

    let mut gmm_all = Vec::new();
    let mut svm_all = Vec::new();
    let mut iso_all = Vec::new();
    let weight_sum = total_weight(&params.recruiter_thresholds);

    let mut anchor_ids: Vec<&String> = anchors.keys().collect();
    anchor_ids.sort();

    for anchor_id in anchor_ids {
        let trusted_contigs = &anchors[anchor_id];
        let anchor_subcontig_ids: Vec<&String> = subcontigs.iter()
            .filter(|s| trusted_contigs.contains(&s.contig_id))
            .map(|s| &s.id)
            .collect();
        let anchor_features: Vec<Vec<f64>> = anchor_subcontig_ids.iter()
            .filter_map(|id| feature_by_subcontig.get(id.as_str()).map(|f| f.to_vec()))
            .collect();

        if anchor_features.len() < 2 {
            warn!("anchor {anchor_id} has fewer than 2 trusted subcontigs; skipping recruiters");
            diagnostics.record_anchor_skipped(anchor_id);
            continue;
        }

        let mut candidate_ids: Vec<String> = subcontigs.iter()
            .filter(|s| !trusted_contigs.contains(&s.contig_id))
            .map(|s| s.id.clone())
            .collect();
        candidate_ids.sort_unstable();
        let candidate_contig_ids: Vec<String> = candidate_ids.iter()
            .map(|id| subcontig_to_contig[id].clone())
            .collect();
        let candidate_features: Vec<Vec<f64>> = candidate_ids.iter()
            .filter_map(|id| feature_by_subcontig.get(id.as_str()).map(|f| f.to_vec()))
            .collect();

        let keep_mask = if params.kmeans_denoise_enabled {
            kmeans_denoise_filter(&anchor_features, &candidate_features, &candidate_contig_ids,
                feature_dim, params.kmeans_denoise_max_clusters, params.kmeans_denoise_accept_fraction,
                params.random_seed)
        } else {
            vec![true; candidate_features.len()]
        };
        let filtered_ids: Vec<String> = candidate_ids.iter().zip(&keep_mask)
            .filter(|(_, keep)| **keep).map(|(id, _)| id.clone()).collect();
        let filtered_features: Vec<Vec<f64>> = candidate_features.iter().zip(&keep_mask)
            .filter(|(_, keep)| **keep).map(|(f, _)| f.clone()).collect();

        let thresholds = params.recruiter_thresholds;

        match gmm_recruit(&anchor_features, &filtered_features, feature_dim, params.random_seed) {
            Some(flags) => gmm_all.extend(aggregate_recruiter(anchor_id, &flags, &filtered_ids,
                &subcontig_to_contig, thresholds.gmm, 1.0 - thresholds.gmm, weight_sum, true)),
            None => diagnostics.record_recruiter_skipped(anchor_id, RecruiterKind::Gmm),
        }
        match ocsvm_recruit(&anchor_features, &filtered_features, params.ocsvm_gamma, params.ocsvm_nu) {
            Some(flags) => svm_all.extend(aggregate_recruiter(anchor_id, &flags, &filtered_ids,
                &subcontig_to_contig, thresholds.svm, 1.0 - thresholds.svm, weight_sum, params.svm_threshold_strict)),
            None => diagnostics.record_recruiter_skipped(anchor_id, RecruiterKind::Svm),
        }
        match isolation_forest_recruit(&anchor_features, &filtered_features, feature_dim,
            params.isolation_forest_trees, 0.5, params.random_seed) {
            Some(flags) => iso_all.extend(aggregate_recruiter(anchor_id, &flags, &filtered_ids,
                &subcontig_to_contig, thresholds.iso, 1.0 - thresholds.iso, weight_sum, true)),
            None => diagnostics.record_recruiter_skipped(anchor_id, RecruiterKind::Iso),
        }

        diagnostics.record_anchor_passed(anchor_id);
    }

    let ensemble_rows = ensemble::combine(&gmm_all, &svm_all, &iso_all, params.ensemble_accept_threshold);
    let final_labels = reconcile::reconcile(anchors, &anchored_clusters, &ensemble_rows);

    Ok(PipelineOutput {
        denovo_rows,
        denovo_decisions,
        anchored_clusters,
        ensemble_rows,
        final_labels,
        diagnostics,
    })
}

fn build_cluster_rows(subcontig_ids: &[String], subcontig_to_contig: &HashMap<String, String>,
                       labels: &[i64], probabilities: &[f64], outlier_scores: &[f64]) -> Vec<SubcontigClusterRow> {
    subcontig_ids.iter().enumerate().map(|(i, id)| {
        SubcontigClusterRow {
            subcontig_id: id.clone(),
            contig_id: subcontig_to_contig.get(id).cloned().unwrap_or_else(|| id.clone()),
            label: labels[i],
            probability: probabilities[i],
            outlier_score: outlier_scores[i],
        }
    }).collect()
}
