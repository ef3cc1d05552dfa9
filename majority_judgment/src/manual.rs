/*!

This is the long-form manual for `majority_judgment` and `mjtab`.

## Majority judgment

Every voter grades every option on the same scale of qualitative grades.
Two scales are available:

| `gradeScale` | grades, from the best to the worst |
|--------------|------------------------------------|
| `mention7`   | Excellent, Very good, Good, Fair, Passable, Inadequate, Bad |
| `mention5`   | Very good, Good, Passable, Insufficient, To reject |

For each option:
- the **majority grade** is the best grade such that at least half of the
  ballots grade the option at this level or better. An option without any
  ballot gets the worst grade.
- the **score** separates options sharing the same majority grade. It is
  `(p - q) / r` where `p`, `q` and `r` are the shares of ballots strictly
  above, strictly below and exactly at the majority grade. A positive score
  means that the option leans toward the grade above.

Options are ordered by majority grade, then by score. Options with the same
majority grade and the same score are ex-aequo: they share their rank, and the
next option gets its position in the list. For example, one winner followed
by three tied options and a last option gives the ranks `1, 2, 2, 2, 5`.

Approval votes are ranked by number of approvals with the same tie policy.

## Input formats

The following providers are supported:
* `json` tallies in JSON
* `csv`, `xlsx` one row per option with the counts per grade
* `csv_ballots`, `xlsx_ballots` one row per voter

### `json`

```text
{"options": [
  {"id": "a", "label": "Alice", "tally": {"Excellent": 3, "Good": 1}},
  {"id": "b", "tally": {"Bad": 2}}
]}
```

For approval votes, each option carries `"approvals": <count>` instead of a tally.

### `csv` and `xlsx`

```text
id,Excellent,Very good,Good,Fair,Passable,Inadequate,Bad
a,3,0,1,0,0,0,0
b,0,0,0,0,0,0,2
```

The first row names the grades (in any order, grades may be omitted). An
optional `label` column holds the option labels. For approval votes, use a
single `approvals` column. Empty cells count as zero; negative counts are
rejected.

### `csv_ballots` and `xlsx_ballots`

```text
voter,a,b
v1,Very good,Good
v2,Good,
```

The first row holds the option ids, the first column identifies the ballot.
An empty cell means that the voter did not grade this option: it counts as the
worst grade unless `treatBlankAsWorst` is set to `false`. For approval votes,
any non-empty cell other than `0`, `no` or `false` approves the option.

## Configuration

```text
{
  "outputSettings": {"contestName": "Board election", "outputDirectory": null,
                     "contestDate": "2024-05-01", "contestJurisdiction": null,
                     "contestOffice": null},
  "votingSystem": "majorityJudgment",
  "gradeScale": "mention7",
  "options": [{"id": "a", "label": "Alice"}, {"id": "b", "label": "Bob"}],
  "tallySources": [{"provider": "csv", "filePath": "tallies.csv"}]
}
```

Deviations and details:
 - `options` is optional. When missing, the options are taken from the sources.
   A vote needs at least two options, and two options cannot have the same label
   up to case (`Yes` and `yes`).
 - `tallySources`: the paths are relative to the configuration file. When several
   sources are given, the counts of the same option add up.
 - `firstDataRowIndex` (number, optional, default 2): the first row holding data,
   starting at 1. The row just above holds the header.
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of
   the worksheet.
 - `treatBlankAsWorst` (bool, optional, default true): see `csv_ballots`.

The command line flags `--input`, `--input-type`, `--grade-scale` and
`--voting-system` override the configuration file.

 */
