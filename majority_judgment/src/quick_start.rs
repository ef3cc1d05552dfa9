/*!

# Quick start

This guide runs a small vote end to end with `mjtab`, the command line
program shipped with this crate.

**Collect the ballots** Put one row per voter in a spreadsheet, with one
column per option, and export it as CSV. Every cell holds the grade given by
the voter to the option:

```text
voter,Pizza,Sushi,Tacos
v1,Excellent,Good,Fair
v2,Very good,Passable,
v3,Good,Excellent,Bad
```

The empty cell of `v2` counts as `Bad`, the worst grade.

**Tabulate** Run `mjtab` with the following command:

```bash
mjtab -i lunch.csv --input-type csv_ballots
```

The summary is printed in JSON. Every option comes with its rank, its majority
grade and its score:

```text
{
  "config": {"contest": "lunch.csv", "date": null, "jurisdiction": null,
             "votingSystem": "majorityJudgment", "gradeScale": "mention7"},
  "results": [
    {"rank": 1, "id": "Pizza", "majorityGrade": "Very good", "score": 0.0, ...},
    ...
  ]
}
```

Use `--out summary.json` to write it to a file, and `--grade-scale mention5`
for the five-grade scale (Very good, Good, Passable, Insufficient, To reject).

**Going further** Counts that were already aggregated per grade can be passed
directly with `--input-type csv`, `xlsx` or `json`. For recurring contests,
write a configuration file and pass it with `--config`: it names the contest,
lists the options with their labels and can combine several sources. See the
[manual](crate::manual) for all the formats.

 */
